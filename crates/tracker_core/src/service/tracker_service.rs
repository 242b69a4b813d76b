//! Tracker use-case service.
//!
//! # Responsibility
//! - Own the in-memory `Document` and its `DocumentStore`.
//! - Run each mutation against a working copy, persist it, then adopt it.
//!
//! # Invariants
//! - After any call returns, the in-memory document equals the last
//!   document successfully written to storage.
//! - A failed or not-found mutation leaves both memory and storage as they
//!   were.
//! - `remove` of an unknown id is a no-op and still succeeds.

use crate::model::document::Document;
use crate::model::goal::{Goal, ProgressStep};
use crate::model::habit::Habit;
use crate::model::id::RecordId;
use crate::model::note::Note;
use crate::model::record::{Record, RecordKind};
use crate::model::task::Task;
use crate::service::{TrackerError, TrackerResult};
use crate::storage::document_store::DocumentStore;
use crate::storage::KeyValueStore;
use chrono::Utc;
use log::{debug, warn};

/// Single-owner tracker over one persisted document.
pub struct TrackerService<S: KeyValueStore> {
    store: DocumentStore<S>,
    document: Document,
}

impl<S: KeyValueStore> TrackerService<S> {
    /// Loads prior state from `store`, starting empty when none is usable.
    pub fn open(store: DocumentStore<S>) -> Self {
        let document = store.load_or_default();
        Self { store, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    pub fn into_store(self) -> DocumentStore<S> {
        self.store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.document.tasks
    }

    pub fn habits(&self) -> &[Habit] {
        &self.document.habits
    }

    pub fn goals(&self) -> &[Goal] {
        &self.document.goals
    }

    pub fn notes(&self) -> &[Note] {
        &self.document.notes
    }

    pub fn find<R: Record>(&self, id: &RecordId) -> Option<&R> {
        self.document.find(id)
    }

    /// Creates a record with a fresh id and kind defaults, then persists.
    pub fn add<R: Record>(&mut self, draft: R::Draft) -> TrackerResult<R> {
        let id = RecordId::generate();
        let now = Utc::now();
        self.commit("record_add", R::KIND, &id, |document| {
            Ok(document.insert::<R>(id.clone(), draft, now))
        })
    }

    /// Merges `patch` into the record with `id`, then persists.
    ///
    /// # Errors
    /// - `NotFound` when no record of this kind has `id`.
    /// - `Storage` when the commit fails.
    pub fn update<R: Record>(&mut self, id: &RecordId, patch: R::Patch) -> TrackerResult<R> {
        self.commit("record_update", R::KIND, id, |document| {
            document.update::<R>(id, patch).ok_or_else(|| not_found::<R>(id))
        })
    }

    /// Removes the record with `id` and persists.
    ///
    /// Returns `Ok(false)` when there was nothing to remove.
    pub fn remove<R: Record>(&mut self, id: &RecordId) -> TrackerResult<bool> {
        self.remove_kind(R::KIND, id)
    }

    /// Kind-tagged removal for callers that hold a `RecordKind`.
    pub fn remove_kind(&mut self, kind: RecordKind, id: &RecordId) -> TrackerResult<bool> {
        self.commit("record_remove", kind, id, |document| {
            Ok(document.remove_kind(kind, id))
        })
    }

    /// Flips `Task::completed`.
    pub fn toggle_task_completion(&mut self, id: &RecordId) -> TrackerResult<Task> {
        self.commit("task_toggle", RecordKind::Task, id, |document| {
            document
                .toggle_task_completion(id)
                .ok_or_else(|| not_found::<Task>(id))
        })
    }

    /// Flips `Habit::completed_today`, bumping the streak on false -> true.
    pub fn toggle_habit_completion(&mut self, id: &RecordId) -> TrackerResult<Habit> {
        self.commit("habit_toggle", RecordKind::Habit, id, |document| {
            document
                .toggle_habit_completion(id)
                .ok_or_else(|| not_found::<Habit>(id))
        })
    }

    /// Moves goal progress by `delta`, clamped to `0..=100`.
    pub fn adjust_goal_progress(&mut self, id: &RecordId, delta: i64) -> TrackerResult<Goal> {
        self.commit("goal_adjust", RecordKind::Goal, id, |document| {
            document
                .adjust_goal_progress(id, delta)
                .ok_or_else(|| not_found::<Goal>(id))
        })
    }

    /// Moves goal progress one fixed step forward or back.
    pub fn step_goal_progress(&mut self, id: &RecordId, step: ProgressStep) -> TrackerResult<Goal> {
        self.adjust_goal_progress(id, step.delta())
    }

    fn commit<T, F>(
        &mut self,
        event: &'static str,
        kind: RecordKind,
        id: &RecordId,
        mutate: F,
    ) -> TrackerResult<T>
    where
        F: FnOnce(&mut Document) -> TrackerResult<T>,
    {
        let mut next = self.document.clone();
        let output = match mutate(&mut next) {
            Ok(output) => output,
            Err(err) => {
                debug!(
                    "event={} module=service status=rejected kind={} id={} error={}",
                    event, kind, id, err
                );
                return Err(err);
            }
        };

        if let Err(err) = self.store.save(&next) {
            warn!(
                "event={} module=service status=error kind={} id={} error_code=commit_failed",
                event, kind, id
            );
            return Err(err.into());
        }

        self.document = next;
        debug!(
            "event={} module=service status=ok kind={} id={}",
            event, kind, id
        );
        Ok(output)
    }
}

fn not_found<R: Record>(id: &RecordId) -> TrackerError {
    TrackerError::NotFound {
        kind: R::KIND,
        id: id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::TrackerService;
    use crate::model::document::Document;
    use crate::model::task::{Task, TaskDraft};
    use crate::service::TrackerError;
    use crate::storage::document_store::DocumentStore;
    use crate::storage::memory::MemoryKvStore;
    use crate::storage::{KeyValueStore, StorageError, StorageResult};

    /// Accepts writes until `remaining_writes` runs out.
    struct FlakyKv {
        inner: MemoryKvStore,
        remaining_writes: usize,
    }

    impl KeyValueStore for FlakyKv {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
            if self.remaining_writes == 0 {
                return Err(StorageError::Unavailable("disk full".to_string()));
            }
            self.remaining_writes -= 1;
            self.inner.set(key, value)
        }
    }

    #[test]
    fn failed_save_leaves_memory_and_storage_unchanged() {
        let kv = FlakyKv {
            inner: MemoryKvStore::new(),
            remaining_writes: 1,
        };
        let mut service = TrackerService::open(DocumentStore::new(kv));

        let task = service.add::<Task>(TaskDraft::new("Buy milk")).unwrap();
        let before: Document = service.document().clone();

        let err = service.toggle_task_completion(&task.id).unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(service.document(), &before);
        assert_eq!(service.store().load().unwrap(), before);
    }

    #[test]
    fn not_found_does_not_write() {
        let kv = FlakyKv {
            inner: MemoryKvStore::new(),
            remaining_writes: 0,
        };
        let mut service = TrackerService::open(DocumentStore::new(kv));

        let err = service
            .toggle_task_completion(&"missing".into())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(service.store().backend().inner.is_empty());
    }
}
