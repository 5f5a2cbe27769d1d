use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::data::models::{AuthError, User};
use crate::state::AppState;

/// The user behind the request's `Authorization: Bearer` token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let claims = state.tokens.validate(bearer.token())?;

        match state.store.find_user_by_id(&claims.sub)? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                log::warn!("Token for unknown user {}", claims.sub);
                Err(AuthError::InvalidToken)
            }
        }
    }
}
