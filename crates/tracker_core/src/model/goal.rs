//! Goal records with bounded progress.
//!
//! # Invariants
//! - `progress` is always within `0..=100`, including values read from
//!   storage.

use crate::model::document::Document;
use crate::model::id::RecordId;
use crate::model::record::{Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const PROGRESS_MIN: u8 = 0;
pub const PROGRESS_MAX: u8 = 100;
/// Increment used by the step controls (`+10` / `-10`).
pub const PROGRESS_STEP: i64 = 10;

/// Long-running objective tracked as a percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a goal. A supplied `progress` is clamped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub progress: Option<i64>,
}

/// Direction of a fixed-size progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    Forward,
    Back,
}

impl ProgressStep {
    pub fn delta(self) -> i64 {
        match self {
            Self::Forward => PROGRESS_STEP,
            Self::Back => -PROGRESS_STEP,
        }
    }
}

/// Clamps any integer into the valid progress range.
pub fn clamp_progress(value: i64) -> u8 {
    // Lossless: the clamp bounds fit in u8.
    value.clamp(i64::from(PROGRESS_MIN), i64::from(PROGRESS_MAX)) as u8
}

impl Goal {
    /// Moves progress by `delta`, saturating at the range bounds.
    pub fn adjust_progress(&mut self, delta: i64) -> u8 {
        self.progress = clamp_progress(i64::from(self.progress).saturating_add(delta));
        self.progress
    }

    pub fn is_achieved(&self) -> bool {
        self.progress == PROGRESS_MAX
    }
}

impl Record for Goal {
    type Draft = GoalDraft;
    type Patch = GoalPatch;

    const KIND: RecordKind = RecordKind::Goal;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: GoalDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            progress: PROGRESS_MIN,
        }
    }

    fn apply_patch(&mut self, patch: GoalPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(progress) = patch.progress {
            self.progress = clamp_progress(progress);
        }
    }

    fn collection(document: &Document) -> &[Self] {
        &document.goals
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.goals
    }
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "goal progress must be a finite number, got {raw}"
        )));
    }
    // Saturating float-to-int cast, then clamp into range.
    Ok(clamp_progress(raw.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::{clamp_progress, Goal, GoalDraft, GoalPatch, ProgressStep};
    use crate::model::id::RecordId;
    use crate::model::record::Record;
    use chrono::Utc;

    fn reading_goal() -> Goal {
        Goal::from_draft(
            RecordId::from("g1"),
            GoalDraft::new("Read 12 books"),
            Utc::now(),
        )
    }

    #[test]
    fn adjust_progress_clamps_both_ends() {
        let mut goal = reading_goal();
        assert_eq!(goal.adjust_progress(-1000), 0);
        assert_eq!(goal.adjust_progress(1000), 100);
        assert_eq!(goal.adjust_progress(i64::MAX), 100);
        assert_eq!(goal.adjust_progress(i64::MIN), 0);
    }

    #[test]
    fn steps_accumulate_and_saturate() {
        let mut goal = reading_goal();
        for _ in 0..5 {
            goal.adjust_progress(ProgressStep::Forward.delta());
        }
        assert_eq!(goal.progress, 50);
        assert_eq!(goal.adjust_progress(60), 100);
        assert!(goal.is_achieved());
        assert_eq!(goal.adjust_progress(ProgressStep::Back.delta()), 90);
    }

    #[test]
    fn patch_progress_is_clamped() {
        let mut goal = reading_goal();
        goal.apply_patch(GoalPatch {
            progress: Some(250),
            ..GoalPatch::default()
        });
        assert_eq!(goal.progress, 100);
        assert_eq!(goal.title, "Read 12 books");
    }

    #[test]
    fn stored_progress_is_clamped_on_read() {
        let goal: Goal = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "title": "overshoot",
            "progress": 140
        }))
        .unwrap();
        assert_eq!(goal.progress, 100);

        let goal: Goal = serde_json::from_value(serde_json::json!({
            "id": "g2",
            "title": "undershoot",
            "progress": -30
        }))
        .unwrap();
        assert_eq!(goal.progress, 0);
    }

    #[test]
    fn clamp_progress_keeps_in_range_values() {
        assert_eq!(clamp_progress(42), 42);
    }
}
