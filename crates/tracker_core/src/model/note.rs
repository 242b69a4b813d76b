//! Note records.
//!
//! # Invariants
//! - `created` is stamped once by `Record::from_draft` and never patched.

use crate::model::document::Document;
use crate::model::id::RecordId;
use crate::model::record::{Record, RecordKind};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Free-form text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Serialized as RFC 3339 UTC, millisecond precision.
    #[serde(serialize_with = "serialize_created")]
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Record for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            // Millisecond precision keeps the in-memory value equal to what
            // a save/load round trip yields.
            created: now.trunc_subsecs(3),
        }
    }

    fn apply_patch(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    fn collection(document: &Document) -> &[Self] {
        &document.notes
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.notes
    }
}

fn serialize_created<S>(created: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&created.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NotePatch};
    use crate::model::id::RecordId;
    use crate::model::record::Record;
    use chrono::{TimeZone, Utc};

    #[test]
    fn created_is_truncated_to_millis_and_survives_patch() {
        let now = Utc.timestamp_nanos(1_760_000_000_123_456_789);
        let mut note = Note::from_draft(
            RecordId::from("n1"),
            NoteDraft::new("Standup", "ship the tracker"),
            now,
        );
        assert_eq!(note.created.timestamp_subsec_nanos(), 123_000_000);

        let created = note.created;
        note.apply_patch(NotePatch {
            content: Some("ship it today".to_string()),
            ..NotePatch::default()
        });
        assert_eq!(note.created, created);
        assert_eq!(note.title, "Standup");
    }

    #[test]
    fn reads_javascript_iso_timestamps() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "id": "1718000000000",
            "title": "legacy",
            "content": "body",
            "created": "2024-06-10T06:13:20.000Z"
        }))
        .unwrap();
        assert_eq!(note.created.timestamp_millis(), 1_718_000_000_000);
    }

    #[test]
    fn created_is_written_with_three_fraction_digits() {
        let whole_second = Note::from_draft(
            RecordId::from("n1"),
            NoteDraft::new("a", "b"),
            Utc.timestamp_millis_opt(1_718_000_000_000).unwrap(),
        );
        let json = serde_json::to_value(&whole_second).unwrap();
        assert_eq!(json["created"], "2024-06-10T06:13:20.000Z");

        let with_millis = Note::from_draft(
            RecordId::from("n2"),
            NoteDraft::new("a", "b"),
            Utc.timestamp_millis_opt(1_718_000_000_123).unwrap(),
        );
        let json = serde_json::to_value(&with_millis).unwrap();
        assert_eq!(json["created"], "2024-06-10T06:13:20.123Z");
    }

    #[test]
    fn records_without_text_fields_load_with_empty_text() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "id": "1718000000005",
            "created": "2024-06-10T06:13:20.000Z"
        }))
        .unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
    }
}
