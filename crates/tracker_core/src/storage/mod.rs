//! Persistence boundary for the tracker document.
//!
//! # Responsibility
//! - Define the get/set key-value contract the core persists through.
//! - Serialize the aggregate document under one fixed key.
//!
//! # Invariants
//! - The whole document is written on every save; there are no partial writes.
//! - Load never fails: absent, unreadable or malformed state reads as empty.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_store;
pub mod memory;
pub mod sqlite_kv;

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value backends and document encoding.
#[derive(Debug)]
pub enum StorageError {
    /// Backend could not serve the request.
    Unavailable(String),
    /// Connection did not go through `db::open_db`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection carries the current version but the backing table is missing.
    MissingRequiredTable(&'static str),
    /// Database file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Minimal key-value contract backing the tracker.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
