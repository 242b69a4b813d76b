//! Domain model for tracked records and their aggregate document.
//!
//! # Responsibility
//! - Define the four record kinds (task, habit, goal, note) and their drafts
//!   and patches.
//! - Own the pure state transitions over the aggregate `Document`.
//!
//! # Invariants
//! - Every record is identified by an opaque, unique `RecordId`.
//! - Collections keep insertion order.
//! - Transitions here never touch storage; persistence is the service's job.

pub mod document;
pub mod goal;
pub mod habit;
pub mod id;
pub mod note;
pub mod record;
pub mod task;
