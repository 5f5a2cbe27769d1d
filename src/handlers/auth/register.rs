use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    data::models::{NewUser, RegisterError, RegisterForm, TokenResponse},
    features::auth::password,
    state::AppState,
    utils::JsonBody,
};

#[axum::debug_handler(state = AppState)]
pub async fn handle_register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<Json<TokenResponse>, RegisterError> {
    form.validate().map_err(RegisterError::from)?;

    if state.store.find_user_by_email(&form.email)?.is_some() {
        log::warn!("Registration attempt with existing email: {}", form.email);
        return Err(RegisterError::EmailTaken);
    }

    let hashed_password =
        password::hash_password_blocking(form.password, state.bcrypt_cost).await?;

    let user = state
        .store
        .create_user(NewUser {
            email: form.email,
            name: form.name,
            picture: None,
            hashed_password: Some(hashed_password),
        })
        .map_err(|e| {
            log::error!("User creation failed: {}", e);
            RegisterError::from(e)
        })?;

    let token = state.tokens.issue(&user)?;

    log::info!("New user registered: {}", user.email);
    Ok(Json(TokenResponse::bearer(token)))
}
