//! Kind tag and the per-kind record contract.
//!
//! # Responsibility
//! - Name the four record kinds with stable lowercase tags.
//! - Give generic collection operations one static-dispatch seam per kind.
//!
//! # Invariants
//! - `Record::collection` and `Record::collection_mut` always address the
//!   same field of `Document` for a given kind.

use crate::model::document::Document;
use crate::model::id::RecordId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Runtime tag for the four record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Task,
    Habit,
    Goal,
    Note,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [Self::Task, Self::Habit, Self::Goal, Self::Note];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Habit => "habit",
            Self::Goal => "goal",
            Self::Note => "note",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "habit" => Ok(Self::Habit),
            "goal" => Ok(Self::Goal),
            "note" => Ok(Self::Note),
            other => Err(format!(
                "unsupported record kind `{other}`; expected task|habit|goal|note"
            )),
        }
    }
}

/// Contract implemented by each record kind.
///
/// `Draft` carries the caller-supplied fields for creation and `Patch` the
/// editable fields for partial update; everything else is owned by the kind.
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Draft;
    type Patch;

    const KIND: RecordKind;

    fn id(&self) -> &RecordId;

    /// Builds a new record, applying kind-specific defaults.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merges `patch` into `self`, keeping fields the patch leaves unset.
    fn apply_patch(&mut self, patch: Self::Patch);

    fn collection(document: &Document) -> &[Self];

    fn collection_mut(document: &mut Document) -> &mut Vec<Self>;
}
