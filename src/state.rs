//! Application state shared across all route handlers.

use std::sync::Arc;

use anyhow::Context;
use tower_sessions::cookie::Key;

use crate::config::{Config, StoreBackend};
use crate::data::repositories::{DiaryStore, MemoryStore, SqliteStore};
use crate::features::auth::{GoogleOAuth, TokenIssuer};
use crate::features::translation::{GoogleTranslator, TranslationService};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DiaryStore>,
    pub translator: TranslationService,
    pub tokens: TokenIssuer,
    /// `None` when Google credentials are not configured.
    pub oauth: Option<Arc<GoogleOAuth>>,
    pub frontend_url: String,
    pub bcrypt_cost: u32,
    pub session_key: Key,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DiaryStore>,
        translator: TranslationService,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            store,
            translator,
            tokens,
            oauth: None,
            frontend_url: "http://localhost:5173".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_key: Key::generate(),
        }
    }

    pub fn with_oauth(mut self, oauth: GoogleOAuth) -> Self {
        self.oauth = Some(Arc::new(oauth));
        self
    }

    pub fn with_frontend_url(mut self, frontend_url: impl Into<String>) -> Self {
        self.frontend_url = frontend_url.into();
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DiaryStore> = match config.store {
            StoreBackend::Sqlite => {
                log::info!("Using SQLite database at {}", config.database_url);
                Arc::new(
                    SqliteStore::connect(&config.database_url)
                        .context("Failed to open the diary database")?,
                )
            }
            StoreBackend::Memory => {
                log::warn!("Using the in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let translator = TranslationService::new(GoogleTranslator::new(&config.translate_url));
        let ttl = chrono::Duration::try_minutes(config.token_ttl_minutes)
            .context("TOKEN_TTL_MINUTES is out of range")?;
        let tokens = TokenIssuer::new(&config.jwt_secret, ttl);

        let mut state = Self::new(store, translator, tokens)
            .with_frontend_url(&config.frontend_url)
            .with_bcrypt_cost(config.bcrypt_cost);

        if let Some(google) = &config.google {
            let oauth = GoogleOAuth::new(google)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .context("Invalid Google OAuth settings")?;
            state = state.with_oauth(oauth);
        }

        match config.session_secret.as_deref().map(str::as_bytes).map(Key::try_from) {
            Some(Ok(key)) => state.session_key = key,
            Some(Err(_)) => {
                log::warn!("SESSION_SECRET shorter than 64 bytes, using a random session key")
            }
            None => log::warn!("SESSION_SECRET not set, using a random session key"),
        }

        Ok(state)
    }
}
