//! Persistence adapter: one JSON document under one key.
//!
//! # Responsibility
//! - Encode the full `Document` and write it with a single `set`.
//! - Decode the stored value on load, degrading to "no prior state" on any
//!   backend or parse failure.
//!
//! # Invariants
//! - `load` never returns an error.
//! - `save` writes the whole document or nothing.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::model::document::Document;
use log::{info, warn};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "productivity-data";

/// Reads and writes the aggregate document through a key-value backend.
pub struct DocumentStore<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> DocumentStore<S> {
    /// Creates an adapter bound to [`DEFAULT_STORAGE_KEY`].
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Borrows the underlying backend.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn into_backend(self) -> S {
        self.kv
    }

    /// Loads the stored document.
    ///
    /// Returns `None` when nothing usable is stored: the key is absent, the
    /// backend failed, or the value is not a valid document.
    pub fn load(&self) -> Option<Document> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=document_load module=storage status=ok state=absent");
                return None;
            }
            Err(err) => {
                warn!(
                    "event=document_load module=storage status=degraded error_code=storage_unavailable error={}",
                    err
                );
                return None;
            }
        };

        match serde_json::from_str::<Document>(&raw) {
            Ok(document) => {
                info!(
                    "event=document_load module=storage status=ok tasks={} habits={} goals={} notes={}",
                    document.tasks.len(),
                    document.habits.len(),
                    document.goals.len(),
                    document.notes.len()
                );
                Some(document)
            }
            Err(err) => {
                // Only the position is logged; the message may quote content.
                warn!(
                    "event=document_load module=storage status=degraded error_code=parse_failed line={} column={} bytes={}",
                    err.line(),
                    err.column(),
                    raw.len()
                );
                None
            }
        }
    }

    /// Loads the stored document, or a fresh empty one.
    pub fn load_or_default(&self) -> Document {
        self.load().unwrap_or_default()
    }

    /// Serializes `document` and overwrites the stored value.
    pub fn save(&mut self, document: &Document) -> StorageResult<()> {
        let encoded = serde_json::to_string(document).map_err(StorageError::Encode)?;
        if let Err(err) = self.kv.set(&self.key, &encoded) {
            warn!(
                "event=document_save module=storage status=error error={}",
                err
            );
            return Err(err);
        }
        info!(
            "event=document_save module=storage status=ok bytes={}",
            encoded.len()
        );
        Ok(())
    }
}
