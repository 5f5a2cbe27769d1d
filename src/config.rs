use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result, bail};

use crate::features::auth::DEFAULT_TOKEN_TTL_MINUTES;
use crate::features::translation::DEFAULT_TRANSLATE_URL;

const DEV_JWT_SECRET: &str = "your-secure-jwt-secret-key";
/// Ten years.
const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub store: StoreBackend,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub google: Option<GoogleSettings>,
    pub session_secret: Option<String>,
    pub frontend_url: String,
    pub translate_url: String,
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| {
                log::info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let jwt_secret = lookup("JWT_SECRET_KEY").unwrap_or_else(|| {
            log::warn!("JWT_SECRET_KEY not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let google = match (lookup("GOOGLE_CLIENT_ID"), lookup("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleSettings {
                client_id,
                client_secret,
                redirect_uri: var("GOOGLE_REDIRECT_URI", "http://localhost:8000/auth/callback"),
            }),
            (None, None) => {
                log::info!("Google OAuth not configured, /auth/login is disabled");
                None
            }
            _ => bail!("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set together"),
        };

        let token_ttl_minutes: i64 = parse(
            "TOKEN_TTL_MINUTES",
            &var("TOKEN_TTL_MINUTES", &DEFAULT_TOKEN_TTL_MINUTES.to_string()),
        )?;
        if token_ttl_minutes <= 0 || token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            bail!("TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}");
        }

        Ok(Self {
            bind_address: var("BIND_ADDRESS", "127.0.0.1:8000"),
            store: parse("DIARY_STORE", &var("DIARY_STORE", "sqlite"))?,
            database_url: var("DATABASE_URL", "parallel_diary.db"),
            jwt_secret,
            token_ttl_minutes,
            bcrypt_cost: parse(
                "BCRYPT_COST",
                &var("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string()),
            )?,
            google,
            session_secret: lookup("SESSION_SECRET"),
            frontend_url: var("FRONTEND_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
            translate_url: var("TRANSLATE_URL", DEFAULT_TRANSLATE_URL),
        })
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value {value:?}"))
}
