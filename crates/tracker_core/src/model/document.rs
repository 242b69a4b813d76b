//! Aggregate document holding all four collections.
//!
//! # Responsibility
//! - Be the single persisted unit (`{tasks, habits, goals, notes}`).
//! - Provide pure, storage-free transitions over the collections.
//!
//! # Invariants
//! - Collections keep insertion order.
//! - A transition that targets a missing id leaves the document unchanged.

use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::id::RecordId;
use crate::model::note::Note;
use crate::model::record::{Record, RecordKind};
use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The whole tracker state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.habits.is_empty()
            && self.goals.is_empty()
            && self.notes.is_empty()
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Task => self.tasks.len(),
            RecordKind::Habit => self.habits.len(),
            RecordKind::Goal => self.goals.len(),
            RecordKind::Note => self.notes.len(),
        }
    }

    pub fn records<R: Record>(&self) -> &[R] {
        R::collection(self)
    }

    pub fn find<R: Record>(&self, id: &RecordId) -> Option<&R> {
        R::collection(self).iter().find(|record| record.id() == id)
    }

    /// Appends a new record built from `draft` and returns a copy of it.
    pub fn insert<R: Record>(&mut self, id: RecordId, draft: R::Draft, now: DateTime<Utc>) -> R {
        let record = R::from_draft(id, draft, now);
        R::collection_mut(self).push(record.clone());
        record
    }

    /// Merges `patch` into the record with `id`.
    ///
    /// Returns `None` when no such record exists.
    pub fn update<R: Record>(&mut self, id: &RecordId, patch: R::Patch) -> Option<R> {
        self.modify(id, |record: &mut R| record.apply_patch(patch))
    }

    /// Applies `change` to the record with `id` and returns the new value.
    pub fn modify<R, F>(&mut self, id: &RecordId, change: F) -> Option<R>
    where
        R: Record,
        F: FnOnce(&mut R),
    {
        let record = R::collection_mut(self)
            .iter_mut()
            .find(|record| record.id() == id)?;
        change(record);
        Some(record.clone())
    }

    /// Drops every record with `id`. Returns whether anything was removed.
    pub fn remove<R: Record>(&mut self, id: &RecordId) -> bool {
        let collection = R::collection_mut(self);
        let before = collection.len();
        collection.retain(|record| record.id() != id);
        collection.len() != before
    }

    /// Kind-tagged variant of [`Document::remove`].
    pub fn remove_kind(&mut self, kind: RecordKind, id: &RecordId) -> bool {
        match kind {
            RecordKind::Task => self.remove::<Task>(id),
            RecordKind::Habit => self.remove::<Habit>(id),
            RecordKind::Goal => self.remove::<Goal>(id),
            RecordKind::Note => self.remove::<Note>(id),
        }
    }

    pub fn toggle_task_completion(&mut self, id: &RecordId) -> Option<Task> {
        self.modify(id, |task: &mut Task| {
            task.toggle_completion();
        })
    }

    pub fn toggle_habit_completion(&mut self, id: &RecordId) -> Option<Habit> {
        self.modify(id, |habit: &mut Habit| {
            habit.toggle_completion();
        })
    }

    pub fn adjust_goal_progress(&mut self, id: &RecordId, delta: i64) -> Option<Goal> {
        self.modify(id, |goal: &mut Goal| {
            goal.adjust_progress(delta);
        })
    }
}
