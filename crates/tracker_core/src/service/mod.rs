//! Core use-case services.
//!
//! # Responsibility
//! - Pair every document mutation with a full persistence commit.
//! - Expose the caller-facing contract: tracker operations, form sessions
//!   and dashboard projections.

use crate::model::id::RecordId;
use crate::model::record::RecordKind;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dashboard;
pub mod form;
pub mod tracker_service;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Error returned by tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// No record of `kind` has `id`. Nothing was changed or written.
    NotFound { kind: RecordKind, id: RecordId },
    /// Caller input was rejected before any mutation.
    InvalidInput(String),
    /// The document could not be persisted; in-memory state is unchanged.
    Storage(StorageError),
}

impl TrackerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for TrackerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
