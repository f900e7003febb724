//! Connection setup and schema for the document store.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::Connection;

use crate::errors::StorageError;

/// File name of the store inside the application data directory.
pub const DB_FILE_NAME: &str = "planfolio.db";

/// Path of the database file, overridable with `DATABASE_URL`.
pub fn get_db_path(app_data_dir: &str) -> PathBuf {
    std::env::var("DATABASE_URL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(app_data_dir).join(DB_FILE_NAME))
}

/// Opens (creating if needed) the database file and its schema.
pub fn open(db_path: &Path) -> Result<Connection, StorageError> {
    if let Some(db_dir) = db_path.parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir)
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        }
    }

    let conn = Connection::open(db_path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA busy_timeout = 30000;
        PRAGMA synchronous  = NORMAL;
        ",
    )?;
    init_schema(&conn)?;
    debug!("Opened document store at {}", db_path.display());
    Ok(conn)
}

/// Opens a private in-memory database with the schema in place.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the key-value table. Safe to run on an existing database.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
