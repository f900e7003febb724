use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db;
use crate::errors::{IntoCore, StorageError};
use planfolio_core::errors::Result;
use planfolio_core::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

/// Stores each snapshot as one JSON document in the `documents` table.
pub struct SqliteSnapshotRepository {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotRepository {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = db::open(db_path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps a connection whose schema is already initialised.
    pub fn from_connection(conn: Connection) -> Self {
        SqliteSnapshotRepository {
            conn: Mutex::new(conn),
        }
    }

    fn connection(&self) -> std::result::Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Keys of every stored document, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT key FROM documents ORDER BY key")
            .into_core()?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;
        Ok(keys)
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SqliteSnapshotRepository {
    fn load(&self, key: &str) -> Result<Option<PortfolioSnapshot>> {
        let conn = self.connection()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .into_core()?;

        match value {
            Some(json) => {
                let snapshot = serde_json::from_str(&json).map_err(StorageError::from)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, snapshot: &PortfolioSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot).map_err(StorageError::from)?;
        let now = Utc::now().to_rfc3339();
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, now],
        )
        .into_core()?;
        debug!("Saved snapshot '{}' ({} bytes)", key, json.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let conn = self.connection()?;
        let affected = conn
            .execute("DELETE FROM documents WHERE key = ?1", params![key])
            .into_core()?;
        debug!("Deleted snapshot '{}' ({} rows)", key, affected);
        Ok(())
    }
}
