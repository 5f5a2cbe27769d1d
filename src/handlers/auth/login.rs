use axum::{Json, extract::State};

use crate::{
    data::models::{LoginError, LoginForm, TokenResponse, UserResponse},
    features::auth::{CurrentUser, password},
    state::AppState,
    utils::JsonBody,
};

#[axum::debug_handler(state = AppState)]
pub async fn handle_login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<TokenResponse>, LoginError> {
    let user = state.store.find_user_by_email(&form.email).map_err(|e| {
        log::error!("Database error during login: {}", e);
        LoginError::DatabaseError(e)
    })?;

    match user {
        Some(user) => {
            let is_valid =
                password::verify_password_blocking(user.hashed_password.clone(), form.password)
                    .await
                    .map_err(|e| {
                        log::error!("Password verification failed: {}", e);
                        LoginError::HashingError(e)
                    })?;

            if is_valid {
                let token = state.tokens.issue(&user)?;
                Ok(Json(TokenResponse::bearer(token)))
            } else {
                log::warn!("Invalid password for user: {}", form.email);
                Err(LoginError::InvalidCredentials)
            }
        }
        None => {
            log::warn!("User not found: {}", form.email);
            Err(LoginError::InvalidCredentials)
        }
    }
}

pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
