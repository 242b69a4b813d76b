//! Core state and persistence for a personal productivity tracker.
//! Tasks, habits, goals and notes live in one document that is written back
//! in full after every change.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::{ConfigError, ConfigResult, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::Document;
pub use model::goal::{clamp_progress, Goal, GoalDraft, GoalPatch, ProgressStep};
pub use model::habit::{Habit, HabitDraft, HabitPatch};
pub use model::id::RecordId;
pub use model::note::{Note, NoteDraft, NotePatch};
pub use model::record::{Record, RecordKind};
pub use model::task::{Task, TaskDraft, TaskPatch};
pub use service::dashboard::DashboardSummary;
pub use service::form::{FormRecord, FormSession};
pub use service::tracker_service::TrackerService;
pub use service::{TrackerError, TrackerResult};
pub use storage::document_store::{DocumentStore, DEFAULT_STORAGE_KEY};
pub use storage::memory::MemoryKvStore;
pub use storage::sqlite_kv::SqliteKvStore;
pub use storage::{KeyValueStore, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
