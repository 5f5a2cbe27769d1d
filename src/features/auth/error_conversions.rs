use jsonwebtoken::errors::Error as JwtError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use crate::data::models::{AuthError, LoginError, RegisterError};
use crate::data::repositories::StoreError;
use crate::features::auth::password::PasswordError;

impl From<StoreError> for LoginError {
    fn from(err: StoreError) -> Self {
        LoginError::DatabaseError(err)
    }
}

impl From<PasswordError> for LoginError {
    fn from(err: PasswordError) -> Self {
        LoginError::HashingError(err)
    }
}

impl From<JwtError> for LoginError {
    fn from(err: JwtError) -> Self {
        LoginError::TokenError(err)
    }
}

impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => RegisterError::EmailTaken,
            other => RegisterError::DatabaseError(other),
        }
    }
}

impl From<PasswordError> for RegisterError {
    fn from(err: PasswordError) -> Self {
        RegisterError::HashingError(err)
    }
}

impl From<JwtError> for RegisterError {
    fn from(err: JwtError) -> Self {
        RegisterError::TokenError(err)
    }
}

impl From<ValidationErrors> for RegisterError {
    fn from(err: ValidationErrors) -> Self {
        RegisterError::ValidationError(err.to_string())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::DatabaseError(err)
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::TokenError(err)
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::SessionError(err.to_string())
    }
}
