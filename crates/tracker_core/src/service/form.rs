//! Form session for creating or editing one record.
//!
//! # Responsibility
//! - Hold transient editing state: record kind, optional target id, raw
//!   string field values.
//! - Turn a submitted form into `add` (no target) or `update` (target).
//!
//! # Invariants
//! - Fields are validated before the tracker is touched; a rejected submit
//!   changes nothing.
//! - Blank optional `description` means "no description".

use crate::model::goal::{Goal, GoalDraft, GoalPatch};
use crate::model::habit::{Habit, HabitDraft, HabitPatch};
use crate::model::id::RecordId;
use crate::model::note::{Note, NoteDraft, NotePatch};
use crate::model::record::{Record, RecordKind};
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::service::tracker_service::TrackerService;
use crate::service::{TrackerError, TrackerResult};
use crate::storage::KeyValueStore;
use std::collections::BTreeMap;

const FIELD_TITLE: &str = "title";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_NAME: &str = "name";
const FIELD_CONTENT: &str = "content";

/// Editable field names per kind.
pub fn editable_fields(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Task | RecordKind::Goal => &[FIELD_TITLE, FIELD_DESCRIPTION],
        RecordKind::Habit => &[FIELD_NAME],
        RecordKind::Note => &[FIELD_TITLE, FIELD_CONTENT],
    }
}

/// Transient state of one open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    kind: RecordKind,
    target: Option<RecordId>,
    fields: BTreeMap<String, String>,
}

impl FormSession {
    /// Opens an empty form that will create a new record of `kind`.
    pub fn open_new(kind: RecordKind) -> Self {
        Self {
            kind,
            target: None,
            fields: BTreeMap::new(),
        }
    }

    /// Opens a form pre-filled from an existing record.
    pub fn open_edit<R: FormRecord>(record: &R) -> Self {
        Self {
            kind: R::KIND,
            target: Some(record.id().clone()),
            fields: record.form_fields(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn target(&self) -> Option<&RecordId> {
        self.target.as_ref()
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Records one raw field value.
    ///
    /// # Errors
    /// - `InvalidInput` when `name` is not editable for this kind.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> TrackerResult<()> {
        if !editable_fields(self.kind).contains(&name) {
            return Err(TrackerError::InvalidInput(format!(
                "field `{name}` is not editable on a {}",
                self.kind
            )));
        }
        self.fields.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Dispatches `add` or `update` and returns the affected record id.
    ///
    /// The session is consumed; callers close the form on success.
    pub fn submit<S: KeyValueStore>(self, service: &mut TrackerService<S>) -> TrackerResult<RecordId> {
        match self.kind {
            RecordKind::Task => self.submit_as::<Task, S>(service),
            RecordKind::Habit => self.submit_as::<Habit, S>(service),
            RecordKind::Goal => self.submit_as::<Goal, S>(service),
            RecordKind::Note => self.submit_as::<Note, S>(service),
        }
    }

    fn submit_as<R: FormRecord, S: KeyValueStore>(
        self,
        service: &mut TrackerService<S>,
    ) -> TrackerResult<RecordId> {
        let fields = FormFields(&self.fields);
        let record = match &self.target {
            Some(id) => service.update::<R>(id, R::patch_from_form(&fields)?)?,
            None => service.add::<R>(R::draft_from_form(&fields)?)?,
        };
        Ok(record.id().clone())
    }
}

/// Read view over submitted raw values.
pub struct FormFields<'a>(&'a BTreeMap<String, String>);

impl FormFields<'_> {
    fn required(&self, name: &str) -> TrackerResult<String> {
        match self.0.get(name).map(|value| value.trim()) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(TrackerError::InvalidInput(format!("`{name}` is required"))),
        }
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Like `required`, but keeps the value untrimmed.
    fn required_verbatim(&self, name: &str) -> TrackerResult<String> {
        match self.0.get(name) {
            Some(value) if !value.trim().is_empty() => Ok(value.clone()),
            _ => Err(TrackerError::InvalidInput(format!("`{name}` is required"))),
        }
    }
}

/// Kinds that can be created and edited through a `FormSession`.
pub trait FormRecord: Record {
    fn form_fields(&self) -> BTreeMap<String, String>;
    fn draft_from_form(fields: &FormFields<'_>) -> TrackerResult<Self::Draft>;
    fn patch_from_form(fields: &FormFields<'_>) -> TrackerResult<Self::Patch>;
}

fn field_map<const N: usize>(entries: [(&str, Option<&str>); N]) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name.to_string(), value.to_string())))
        .collect()
}

impl FormRecord for Task {
    fn form_fields(&self) -> BTreeMap<String, String> {
        field_map([
            (FIELD_TITLE, Some(self.title.as_str())),
            (FIELD_DESCRIPTION, self.description.as_deref()),
        ])
    }

    fn draft_from_form(fields: &FormFields<'_>) -> TrackerResult<TaskDraft> {
        Ok(TaskDraft {
            title: fields.required(FIELD_TITLE)?,
            description: fields.optional(FIELD_DESCRIPTION),
        })
    }

    fn patch_from_form(fields: &FormFields<'_>) -> TrackerResult<TaskPatch> {
        Ok(TaskPatch {
            title: Some(fields.required(FIELD_TITLE)?),
            description: Some(fields.optional(FIELD_DESCRIPTION)),
            completed: None,
        })
    }
}

impl FormRecord for Habit {
    fn form_fields(&self) -> BTreeMap<String, String> {
        field_map([(FIELD_NAME, Some(self.name.as_str()))])
    }

    fn draft_from_form(fields: &FormFields<'_>) -> TrackerResult<HabitDraft> {
        Ok(HabitDraft {
            name: fields.required(FIELD_NAME)?,
        })
    }

    fn patch_from_form(fields: &FormFields<'_>) -> TrackerResult<HabitPatch> {
        Ok(HabitPatch {
            name: Some(fields.required(FIELD_NAME)?),
        })
    }
}

impl FormRecord for Goal {
    fn form_fields(&self) -> BTreeMap<String, String> {
        field_map([
            (FIELD_TITLE, Some(self.title.as_str())),
            (FIELD_DESCRIPTION, self.description.as_deref()),
        ])
    }

    fn draft_from_form(fields: &FormFields<'_>) -> TrackerResult<GoalDraft> {
        Ok(GoalDraft {
            title: fields.required(FIELD_TITLE)?,
            description: fields.optional(FIELD_DESCRIPTION),
        })
    }

    fn patch_from_form(fields: &FormFields<'_>) -> TrackerResult<GoalPatch> {
        Ok(GoalPatch {
            title: Some(fields.required(FIELD_TITLE)?),
            description: Some(fields.optional(FIELD_DESCRIPTION)),
            progress: None,
        })
    }
}

impl FormRecord for Note {
    fn form_fields(&self) -> BTreeMap<String, String> {
        field_map([
            (FIELD_TITLE, Some(self.title.as_str())),
            (FIELD_CONTENT, Some(self.content.as_str())),
        ])
    }

    fn draft_from_form(fields: &FormFields<'_>) -> TrackerResult<NoteDraft> {
        Ok(NoteDraft {
            title: fields.required(FIELD_TITLE)?,
            content: fields.required_verbatim(FIELD_CONTENT)?,
        })
    }

    fn patch_from_form(fields: &FormFields<'_>) -> TrackerResult<NotePatch> {
        Ok(NotePatch {
            title: Some(fields.required(FIELD_TITLE)?),
            content: Some(fields.required_verbatim(FIELD_CONTENT)?),
        })
    }
}
