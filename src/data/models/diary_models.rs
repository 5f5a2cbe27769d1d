use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::repositories::StoreError;
use crate::schema::{diary_entries, favorite_expressions};

// Diary and favorites errors
#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("Diary entry content must not be empty")]
    EmptyContent,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("You do not have access to this diary entry")]
    Forbidden,
    #[error("Database error")]
    DatabaseError(StoreError),
}

/// Diary entry as stored, without its favorites
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = diary_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DiaryEntryRow {
    pub id: String,                        // UUID
    pub content: String,                   // Japanese source text
    pub translated_content: String,        // English translation of `content`
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>, // Unset until the first edit
    pub user_id: String,                   // Owner
}

impl DiaryEntryRow {
    pub fn with_favorites(self, favorite_expressions: Vec<FavoriteExpression>) -> DiaryEntry {
        DiaryEntry {
            id: self.id,
            content: self.content,
            translated_content: self.translated_content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: self.user_id,
            favorite_expressions,
        }
    }
}

/// Expression bookmarked from a diary entry
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = favorite_expressions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FavoriteExpression {
    pub id: String,
    pub japanese_text: String,
    pub english_text: String,
    pub note: Option<String>,
    pub diary_entry_id: String, // Parent entry, deleted together with it
    pub created_at: NaiveDateTime,
}

/// Diary entry together with its favorite expressions, as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct DiaryEntry {
    pub id: String,
    pub content: String,
    pub translated_content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub favorite_expressions: Vec<FavoriteExpression>,
}

/// Request payload for creating or editing an entry
#[derive(Debug, Deserialize)]
pub struct DiaryEntryRequest {
    pub content: String,
}

/// Request payload for bookmarking an expression
#[derive(Debug, Clone, Deserialize)]
pub struct NewFavorite {
    pub japanese_text: String,
    pub english_text: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
