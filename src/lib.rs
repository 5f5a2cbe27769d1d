//! Backend for a Japanese/English parallel diary.
//!
//! Users write entries in Japanese, each entry is stored together with its
//! English translation, and expressions worth keeping can be bookmarked as
//! favorites. Accounts sign in with email and password or through Google and
//! receive a bearer JWT for every other route.

use axum::{
    Router,
    routing::{get, post},
};
use time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore as SessionStore, SessionManagerLayer, cookie::SameSite};

pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod schema;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;

use handlers::{auth, diary, health};

fn diary_router() -> Router<AppState> {
    Router::new()
        .route("/diary", post(diary::create_entry).get(diary::list_entries))
        .route(
            "/diary/{id}",
            get(diary::get_entry)
                .put(diary::update_entry)
                .delete(diary::delete_entry),
        )
        .route("/diary/{id}/favorite", post(diary::add_favorite))
        .route("/favorites", get(diary::list_favorites))
}

pub fn create_router(state: AppState) -> Router {
    // Sessions only carry OAuth state between /auth/login and /auth/callback.
    // Lax, because the callback arrives as a cross-site redirect from Google.
    let session_layer = SessionManagerLayer::new(SessionStore::default())
        .with_expiry(Expiry::OnInactivity(Duration::minutes(10)))
        .with_same_site(SameSite::Lax)
        .with_secure(false)
        .with_signed(state.session_key.clone());

    let oauth_router = Router::new()
        .route("/login", get(auth::google_login))
        .route("/callback", get(auth::google_callback))
        .layer(session_layer);

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/register", post(auth::handle_register))
        .route("/login", post(auth::handle_login))
        .route("/me", get(auth::handle_me))
        .merge(diary_router())
        // The web frontend talks to the diary routes under /api.
        .nest("/api", diary_router())
        .nest("/auth", oauth_router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
