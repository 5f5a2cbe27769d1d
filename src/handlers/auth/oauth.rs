use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    data::models::{AuthError, NewUser},
    state::AppState,
    utils::{OAuthSessionState, store_oauth_state, take_oauth_state},
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

pub async fn google_login(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AuthError> {
    let oauth = state.oauth.as_ref().ok_or(AuthError::OAuthUnavailable)?;
    let pending = oauth.authorize_url();

    store_oauth_state(
        &session,
        &OAuthSessionState {
            csrf_state: pending.csrf_state,
            pkce_verifier: pending.pkce_verifier,
        },
    )
    .await?;

    Ok(Redirect::to(&pending.url))
}

pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AuthError> {
    let oauth = state.oauth.as_ref().ok_or(AuthError::OAuthUnavailable)?;

    let pending = take_oauth_state(&session)
        .await?
        .ok_or_else(|| AuthError::OAuthState("no login in progress".into()))?;
    if pending.csrf_state != params.state {
        log::warn!("OAuth callback with mismatched state");
        return Err(AuthError::OAuthState("state mismatch".into()));
    }

    let profile = oauth
        .exchange_code(&params.code, pending.pkce_verifier)
        .await?;

    let user = match state.store.find_user_by_email(&profile.email)? {
        Some(user) => user,
        None => {
            let user = state.store.create_user(NewUser {
                email: profile.email,
                name: profile.name,
                picture: profile.picture,
                hashed_password: None,
            })?;
            log::info!("New user registered through Google: {}", user.email);
            user
        }
    };

    let token = state.tokens.issue(&user)?;
    Ok(Redirect::to(&format!(
        "{}/auth/callback?token={}",
        state.frontend_url, token
    )))
}
