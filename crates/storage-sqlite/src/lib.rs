//! SQLite storage for planfolio.
//!
//! Implements the snapshot repository trait from `planfolio-core` on top of
//! rusqlite. The whole portfolio document is stored as JSON under a key.

pub mod db;
pub mod errors;
pub mod snapshots;

pub use errors::{IntoCore, StorageError};
pub use snapshots::SqliteSnapshotRepository;

pub use planfolio_core::errors::{DatabaseError, Error, Result};
