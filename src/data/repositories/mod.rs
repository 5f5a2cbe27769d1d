//! Persistence for users, diary entries and favorite expressions.
//!
//! Handlers only see [`DiaryStore`]. Two implementations exist: [`SqliteStore`]
//! backed by a pooled diesel connection, and [`MemoryStore`] for development and
//! tests. Both enforce the same ownership rules: an entry is only visible to the
//! user who wrote it, and its favorites go away with it.

use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::data::models::{DiaryEntry, FavoriteExpression, NewFavorite, NewUser, User};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{DbPool, SqliteStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Entry belongs to another user")]
    Forbidden,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Content must not be empty")]
    EmptyContent,
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub trait DiaryStore: Send + Sync {
    /// Fails with [`StoreError::EmailTaken`] when the email is already in use.
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    fn create_entry(
        &self,
        owner_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError>;

    /// Newest first.
    fn list_entries(&self, owner_id: &str) -> Result<Vec<DiaryEntry>, StoreError>;

    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<DiaryEntry, StoreError>;

    /// Replaces both texts and stamps `updated_at`.
    fn update_entry(
        &self,
        owner_id: &str,
        entry_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError>;

    /// Removes the entry and every favorite expression attached to it.
    fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<(), StoreError>;

    fn add_favorite(
        &self,
        owner_id: &str,
        entry_id: &str,
        favorite: NewFavorite,
    ) -> Result<FavoriteExpression, StoreError>;

    /// All favorites across the owner's entries, oldest first.
    fn list_favorites(&self, owner_id: &str) -> Result<Vec<FavoriteExpression>, StoreError>;
}

/// Rejects blank diary content.
pub fn ensure_content(content: &str) -> Result<(), StoreError> {
    if content.trim().is_empty() {
        return Err(StoreError::EmptyContent);
    }
    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
