use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::{AuthError, LoginError, RegisterError};

/// JSON error body shared by every feature: `{"error": ..., "status": ...}`.
pub(crate) fn error_response(status: StatusCode, message: String) -> Response {
    let body = json!({
        "error": message,
        "status": status.as_u16()
    });

    let mut response = (status, axum::Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            LoginError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            LoginError::DatabaseError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            LoginError::HashingError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Hashing error: {}", e),
            ),
            LoginError::TokenError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", e),
            ),
        };

        error_response(status, message)
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RegisterError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            RegisterError::ValidationError(e) => (StatusCode::BAD_REQUEST, e),
            RegisterError::DatabaseError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            RegisterError::HashingError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Hashing error: {}", e),
            ),
            RegisterError::TokenError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", e),
            ),
        };

        error_response(status, message)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::OAuthState(_) => StatusCode::BAD_REQUEST,
            AuthError::OAuthProvider(_) => StatusCode::BAD_GATEWAY,
            AuthError::OAuthUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::TokenError(_) | AuthError::DatabaseError(_) | AuthError::SessionError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            AuthError::TokenError(e) => format!("Token error: {}", e),
            AuthError::DatabaseError(e) => format!("Database error: {}", e),
            other => other.to_string(),
        };

        error_response(status, message)
    }
}
