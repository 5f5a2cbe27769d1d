use std::collections::HashMap;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{DiaryStore, StoreError, ensure_content, new_id, now};
use crate::data::models::{
    DiaryEntry, DiaryEntryRow, FavoriteExpression, NewFavorite, NewUser, User,
};
use crate::schema::{diary_entries, favorite_expressions, users};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE,
        name TEXT,
        picture TEXT,
        hashed_password TEXT,
        created_at TIMESTAMP NOT NULL
    );
    CREATE TABLE IF NOT EXISTS diary_entries (
        id TEXT PRIMARY KEY NOT NULL,
        content TEXT NOT NULL,
        translated_content TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP,
        user_id TEXT NOT NULL REFERENCES users (id)
    );
    CREATE INDEX IF NOT EXISTS diary_entries_user_id ON diary_entries (user_id);
    CREATE TABLE IF NOT EXISTS favorite_expressions (
        id TEXT PRIMARY KEY NOT NULL,
        japanese_text TEXT NOT NULL,
        english_text TEXT NOT NULL,
        note TEXT,
        diary_entry_id TEXT NOT NULL REFERENCES diary_entries (id) ON DELETE CASCADE,
        created_at TIMESTAMP NOT NULL
    );
    CREATE INDEX IF NOT EXISTS favorite_expressions_entry_id
        ON favorite_expressions (diary_entry_id);
";

/// Applied to every connection the pool hands out.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the tables exist.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;
        Self::from_pool(pool)
    }

    /// Single-connection in-memory database. A second connection would see an
    /// empty database, so the pool never grows or recycles.
    pub fn in_memory() -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;
        Self::from_pool(pool)
    }

    pub fn from_pool(pool: DbPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.conn()?.batch_execute(CREATE_TABLES)?;
        Ok(store)
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool.get().map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            StoreError::Pool(e)
        })
    }

    fn owned_entry(
        conn: &mut SqliteConnection,
        owner_id: &str,
        entry_id: &str,
    ) -> Result<DiaryEntryRow, StoreError> {
        let row = diary_entries::table
            .find(entry_id)
            .select(DiaryEntryRow::as_select())
            .first(conn)
            .optional()?
            .ok_or(StoreError::NotFound("Diary entry"))?;

        if row.user_id != owner_id {
            log::warn!("User {} tried to access entry {}", owner_id, entry_id);
            return Err(StoreError::Forbidden);
        }
        Ok(row)
    }

    fn favorites_of(
        conn: &mut SqliteConnection,
        entry_id: &str,
    ) -> Result<Vec<FavoriteExpression>, DieselError> {
        favorite_expressions::table
            .filter(favorite_expressions::diary_entry_id.eq(entry_id))
            .order(favorite_expressions::created_at.asc())
            .select(FavoriteExpression::as_select())
            .load(conn)
    }
}

impl DiaryStore for SqliteStore {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.conn()?;

        let user = User {
            id: new_id(),
            email: new_user.email,
            name: new_user.name,
            picture: new_user.picture,
            hashed_password: new_user.hashed_password,
            created_at: now(),
        };

        diesel::insert_into(users::table)
            .values(&user)
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::EmailTaken
                }
                other => StoreError::Database(other),
            })?;

        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;
        Ok(users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;
        Ok(users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn create_entry(
        &self,
        owner_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError> {
        ensure_content(content)?;
        let mut conn = self.conn()?;

        let row = DiaryEntryRow {
            id: new_id(),
            content: content.to_string(),
            translated_content: translated_content.to_string(),
            created_at: now(),
            updated_at: None,
            user_id: owner_id.to_string(),
        };

        diesel::insert_into(diary_entries::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(row.with_favorites(Vec::new()))
    }

    fn list_entries(&self, owner_id: &str) -> Result<Vec<DiaryEntry>, StoreError> {
        let mut conn = self.conn()?;

        let rows = diary_entries::table
            .filter(diary_entries::user_id.eq(owner_id))
            .order(diary_entries::created_at.desc())
            .select(DiaryEntryRow::as_select())
            .load(&mut conn)?;

        // One query per owner, however many entries they have.
        let mut favorites: HashMap<String, Vec<FavoriteExpression>> = HashMap::new();
        for favorite in favorite_expressions::table
            .inner_join(diary_entries::table)
            .filter(diary_entries::user_id.eq(owner_id))
            .order(favorite_expressions::created_at.asc())
            .select(FavoriteExpression::as_select())
            .load(&mut conn)?
        {
            favorites
                .entry(favorite.diary_entry_id.clone())
                .or_default()
                .push(favorite);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let entry_favorites = favorites.remove(&row.id).unwrap_or_default();
                row.with_favorites(entry_favorites)
            })
            .collect())
    }

    fn get_entry(&self, owner_id: &str, entry_id: &str) -> Result<DiaryEntry, StoreError> {
        let mut conn = self.conn()?;
        let row = Self::owned_entry(&mut conn, owner_id, entry_id)?;
        let favorites = Self::favorites_of(&mut conn, &row.id)?;
        Ok(row.with_favorites(favorites))
    }

    fn update_entry(
        &self,
        owner_id: &str,
        entry_id: &str,
        content: &str,
        translated_content: &str,
    ) -> Result<DiaryEntry, StoreError> {
        ensure_content(content)?;
        let mut conn = self.conn()?;
        let mut row = Self::owned_entry(&mut conn, owner_id, entry_id)?;

        let updated_at = now();
        diesel::update(diary_entries::table.find(&row.id))
            .set((
                diary_entries::content.eq(content),
                diary_entries::translated_content.eq(translated_content),
                diary_entries::updated_at.eq(Some(updated_at)),
            ))
            .execute(&mut conn)?;

        row.content = content.to_string();
        row.translated_content = translated_content.to_string();
        row.updated_at = Some(updated_at);

        let favorites = Self::favorites_of(&mut conn, &row.id)?;
        Ok(row.with_favorites(favorites))
    }

    fn delete_entry(&self, owner_id: &str, entry_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            let row = Self::owned_entry(conn, owner_id, entry_id)?;
            diesel::delete(
                favorite_expressions::table
                    .filter(favorite_expressions::diary_entry_id.eq(&row.id)),
            )
            .execute(conn)?;
            diesel::delete(diary_entries::table.find(&row.id)).execute(conn)?;
            Ok(())
        })
    }

    fn add_favorite(
        &self,
        owner_id: &str,
        entry_id: &str,
        favorite: NewFavorite,
    ) -> Result<FavoriteExpression, StoreError> {
        let mut conn = self.conn()?;
        let row = Self::owned_entry(&mut conn, owner_id, entry_id)?;

        let expression = FavoriteExpression {
            id: new_id(),
            japanese_text: favorite.japanese_text,
            english_text: favorite.english_text,
            note: favorite.note,
            diary_entry_id: row.id,
            created_at: now(),
        };

        diesel::insert_into(favorite_expressions::table)
            .values(&expression)
            .execute(&mut conn)?;

        Ok(expression)
    }

    fn list_favorites(&self, owner_id: &str) -> Result<Vec<FavoriteExpression>, StoreError> {
        let mut conn = self.conn()?;
        Ok(favorite_expressions::table
            .inner_join(diary_entries::table)
            .filter(diary_entries::user_id.eq(owner_id))
            .order(favorite_expressions::created_at.asc())
            .select(FavoriteExpression::as_select())
            .load(&mut conn)?)
    }
}
