use bcrypt::{BcryptError, hash, verify};
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("{0}")]
    Bcrypt(#[from] BcryptError),
    #[error("Hashing task failed: {0}")]
    Task(#[from] JoinError),
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Accounts created through Google have no hash and never match.
pub fn verify_password(
    stored_hash: Option<&str>,
    input_password: &str,
) -> Result<bool, BcryptError> {
    match stored_hash {
        Some(stored_hash) => verify(input_password, stored_hash),
        None => Ok(false),
    }
}

/// [`hash_password`] on the blocking pool, keeping bcrypt off the runtime
/// workers.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, PasswordError> {
    Ok(spawn_blocking(move || hash_password(&password, cost)).await??)
}

pub async fn verify_password_blocking(
    stored_hash: Option<String>,
    input_password: String,
) -> Result<bool, PasswordError> {
    Ok(spawn_blocking(move || verify_password(stored_hash.as_deref(), &input_password)).await??)
}
