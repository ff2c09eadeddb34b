use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::collection::PlantCollection;
use crate::models::PlantRecord;
use crate::store::{collection_from_slot, encode_collection, PlantStore, PLANTS_KEY};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Failed to encode plants: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// SQLite-backed key/value slots. The plant collection lives in one slot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let db = Database { conn };
        db.initialize_schema()?;
        debug!(path = %db_path.display(), "opened database");

        Ok(db)
    }

    /// In-memory database, gone when dropped
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_slot(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Overwrite a slot
    pub fn put_slot(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    pub fn save_plants(&self, records: &[PlantRecord]) -> Result<(), DatabaseError> {
        let raw = encode_collection(records)?;
        self.put_slot(PLANTS_KEY, &raw)
    }
}

impl PlantStore for Database {
    fn load(&self) -> PlantCollection {
        match self.get_slot(PLANTS_KEY) {
            Ok(slot) => collection_from_slot(slot.as_deref()),
            Err(e) => {
                warn!(error = %e, "failed to read saved plants");
                PlantCollection::new()
            }
        }
    }

    fn save(&self, records: &[PlantRecord]) {
        if let Err(e) = self.save_plants(records) {
            warn!(error = %e, count = records.len(), "failed to save plants");
        }
    }
}
