//! Habit records and the streak counter.
//!
//! # Invariants
//! - `streak` only grows, by exactly 1, when `completed_today` goes
//!   false -> true.
//! - Unmarking a habit keeps the streak as is; there is no decrement.

use crate::model::document::Document;
use crate::model::id::RecordId;
use crate::model::record::{Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurring activity with a completion streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completed_today: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Partial update for a habit.
///
/// Streak and daily completion are driven by `Habit::toggle_completion`
/// only, so they are not part of the patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub name: Option<String>,
}

impl Habit {
    /// Flips `completed_today`; marking it done bumps the streak by one.
    pub fn toggle_completion(&mut self) -> bool {
        self.completed_today = !self.completed_today;
        if self.completed_today {
            self.streak = self.streak.saturating_add(1);
        }
        self.completed_today
    }
}

impl Record for Habit {
    type Draft = HabitDraft;
    type Patch = HabitPatch;

    const KIND: RecordKind = RecordKind::Habit;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: HabitDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            streak: 0,
            completed_today: false,
        }
    }

    fn apply_patch(&mut self, patch: HabitPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }

    fn collection(document: &Document) -> &[Self] {
        &document.habits
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.habits
    }
}
