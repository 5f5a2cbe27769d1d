use std::sync::{Mutex, MutexGuard};

use super::{DiaryStore, StoreError, ensure_content, new_id, now};
use crate::data::models::{
    DiaryEntry, DiaryEntryRow, FavoriteExpression, NewFavorite, NewUser, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    entries: Vec<DiaryEntryRow>,
    favorites: Vec<FavoriteExpression>,
}

impl Tables {
    fn owned_entry(&self, owner_id: &str, entry_id: &str) -> Result<usize, StoreError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or(StoreError::NotFound("Diary entry"))?;

        if self.entries[index].user_id != owner_id {
            log::warn!("User {} tried to access entry {}", owner_id, entry_id);
            return Err(StoreError::Forbidden);
        }
        Ok(index)
    }

    fn assemble(&self, row: &DiaryEntryRow) -> DiaryEntry {
        let favorites = self
            .favorites
            .iter()
            .filter(|favorite| favorite.diary_entry_id == row.id)
            .cloned()
            .collect();
        row.clone().with_favorites(favorites)
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic mid-request cannot leave the vectors half-written, so a
        // poisoned lock is still usable.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiaryStore for MemoryStore {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::EmailTaken);
        }

        let user = User {
            id: new_id(),
            email: new_user.email,
            name: new_user.name,
            picture: new_user.picture,
            hashed_password: new_user.hashed_password,
            created_at: now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    fn create_entry(
        &self,
        owner_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError> {
        ensure_content(content)?;

        let row = DiaryEntryRow {
            id: new_id(),
            content: content.to_string(),
            translated_content: translated_content.to_string(),
            created_at: now(),
            updated_at: None,
            user_id: owner_id.to_string(),
        };
        self.tables().entries.push(row.clone());
        Ok(row.with_favorites(Vec::new()))
    }

    fn list_entries(&self, owner_id: &str) -> Result<Vec<DiaryEntry>, StoreError> {
        let tables = self.tables();
        Ok(tables
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.user_id == owner_id)
            .map(|entry| tables.assemble(entry))
            .collect())
    }

    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<DiaryEntry, StoreError> {
        let tables = self.tables();
        let index = tables.owned_entry(owner_id, entry_id)?;
        Ok(tables.assemble(&tables.entries[index]))
    }

    fn update_entry(
        &self,
        owner_id: &str,
        entry_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError> {
        ensure_content(content)?;

        let mut tables = self.tables();
        let index = tables.owned_entry(owner_id, entry_id)?;

        let entry = &mut tables.entries[index];
        entry.content = content.to_string();
        entry.translated_content = translated_content.to_string();
        entry.updated_at = Some(now());

        Ok(tables.assemble(&tables.entries[index]))
    }

    fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables();
        let index = tables.owned_entry(owner_id, entry_id)?;

        let removed = tables.entries.remove(index);
        tables
            .favorites
            .retain(|favorite| favorite.diary_entry_id != removed.id);
        Ok(())
    }

    fn add_favorite(
        &self,
        owner_id: &str,
        entry_id: &str,
        favorite: NewFavorite,
    ) -> Result<FavoriteExpression, StoreError> {
        let mut tables = self.tables();
        let index = tables.owned_entry(owner_id, entry_id)?;

        let expression = FavoriteExpression {
            id: new_id(),
            japanese_text: favorite.japanese_text,
            english_text: favorite.english_text,
            note: favorite.note,
            diary_entry_id: tables.entries[index].id.clone(),
            created_at: now(),
        };
        tables.favorites.push(expression.clone());
        Ok(expression)
    }

    fn list_favorites(&self, owner_id: &str) -> Result<Vec<FavoriteExpression>, StoreError> {
        let tables = self.tables();
        Ok(tables
            .favorites
            .iter()
            .filter(|favorite| {
                tables
                    .entries
                    .iter()
                    .any(|entry| entry.id == favorite.diary_entry_id && entry.user_id == owner_id)
            })
            .cloned()
            .collect())
    }
}
