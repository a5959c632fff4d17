//! Storage layer for the tk work-session tracker.
//!
//! A single SQLite key-value table, used the way a browser's local storage
//! would be: each key holds one JSON document that is rewritten wholesale on
//! every change. The entry list lives under [`ENTRIES_KEY`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! `kv(key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)`.
//! `updated_at` is ISO 8601 UTC with millisecond precision.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use tk_core::WorkEntry;
use tk_core::store::{self, EntryStore, StoreError};

pub use tk_core::store::ENTRIES_KEY;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored key with its last write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: String,
    pub updated_at: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Lists stored keys in key order.
    pub fn keys(&self) -> Result<Vec<KeyRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, updated_at FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(KeyRecord {
                key: row.get(0)?,
                updated_at: row.get(1)?,
            })
        })?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl EntryStore for Database {
    fn load_entries(&self) -> Vec<WorkEntry> {
        match self.get_value(ENTRIES_KEY) {
            Ok(raw) => store::decode_entries(raw.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored entries, starting empty");
                Vec::new()
            }
        }
    }

    fn save_entries(&mut self, entries: &[WorkEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.set_value(ENTRIES_KEY, &raw)
            .map_err(StoreError::backend)?;
        tracing::trace!(bytes = raw.len(), "entries written");
        Ok(())
    }
}
