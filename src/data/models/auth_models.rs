use jsonwebtoken::errors::Error as JwtError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::data::repositories::StoreError;
use crate::features::auth::password::PasswordError;

// Login specific errors
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Incorrect email address or password")]
    InvalidCredentials,
    #[error("Database error")]
    DatabaseError(StoreError),
    #[error("Hashing error")]
    HashingError(PasswordError),
    #[error("Token error")]
    TokenError(JwtError),
}

// Registration specific errors
#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("{0}")]
    ValidationError(String),
    #[error("Database error")]
    DatabaseError(StoreError),
    #[error("Hashing error")]
    HashingError(PasswordError),
    #[error("Token error")]
    TokenError(JwtError),
}

// Bearer token and OAuth errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Token error")]
    TokenError(JwtError),
    #[error("Database error")]
    DatabaseError(StoreError),
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Google login is not configured")]
    OAuthUnavailable,
    #[error("Invalid OAuth state: {0}")]
    OAuthState(String),
    #[error("OAuth provider error: {0}")]
    OAuthProvider(String),
}

// Form structs
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}
