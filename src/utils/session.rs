use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::data::models::AuthError;

const OAUTH_STATE_KEY: &str = "oauth_state";

/// CSRF state and PKCE verifier kept between `/auth/login` and `/auth/callback`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthSessionState {
    pub csrf_state: String,
    pub pkce_verifier: String,
}

pub async fn store_oauth_state(
    session: &Session,
    state: &OAuthSessionState,
) -> Result<(), AuthError> {
    session.insert(OAUTH_STATE_KEY, state).await?;
    Ok(())
}

/// Removes the pending state so a callback URL can only be used once.
pub async fn take_oauth_state(session: &Session) -> Result<Option<OAuthSessionState>, AuthError> {
    match session.remove::<OAuthSessionState>(OAUTH_STATE_KEY).await {
        Ok(state) => Ok(state),
        Err(e) => {
            log::error!("Failed to read OAuth state from session: {}", e);
            Err(e.into())
        }
    }
}
