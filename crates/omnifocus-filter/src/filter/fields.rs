//! Registry of logical fields a filter may reference.
//!
//! Every field that appears in a [`FilterNode`](super::FilterNode) must be
//! listed here. Fields that also have an entry in the synthetic registry
//! ([`super::synthetic`]) have no plain backing property in one or both
//! dialects and are expanded by a dedicated generator at emission time.

use std::fmt;

use serde::Serialize;

use super::synthetic::lookup_synthetic;

pub const TASK_ID: &str = "task.id";
pub const TASK_NAME: &str = "task.name";
pub const TASK_NOTE: &str = "task.note";
pub const TASK_COMPLETED: &str = "task.completed";
pub const TASK_FLAGGED: &str = "task.flagged";
pub const TASK_IN_INBOX: &str = "task.inInbox";
pub const TASK_BLOCKED: &str = "task.blocked";
pub const TASK_AVAILABLE: &str = "task.available";
pub const TASK_DROPPED: &str = "task.dropped";
pub const TASK_TAG_STATUS_VALID: &str = "task.tagStatusValid";
pub const TASK_CONTAINING_PROJECT: &str = "task.containingProject";
pub const TASK_REPETITION_RULE: &str = "task.repetitionRule";
pub const TASK_DUE_DATE: &str = "task.dueDate";
pub const TASK_DEFER_DATE: &str = "task.deferDate";
pub const TASK_PLANNED_DATE: &str = "task.plannedDate";
pub const TASK_COMPLETION_DATE: &str = "task.completionDate";

/// The flattened tag-name array the caller binds next to the subject.
pub const TASK_TAGS: &str = "taskTags";

/// Category of values a field can be compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Boolean,
    String,
    /// ISO-8601 date or date-time, carried as a string.
    Date,
    Array,
    /// An optional relation that only supports existence checks.
    Object,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known field and the kind of value it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub path: &'static str,
    pub kind: ValueKind,
    pub description: &'static str,
}

impl FieldDef {
    /// Returns true if the field has an entry in the synthetic registry.
    pub fn is_synthetic(&self) -> bool {
        lookup_synthetic(self.path).is_some()
    }
}

const fn field(path: &'static str, kind: ValueKind, description: &'static str) -> FieldDef {
    FieldDef {
        path,
        kind,
        description,
    }
}

/// All fields the validator accepts.
pub static KNOWN_FIELDS: &[FieldDef] = &[
    field(TASK_ID, ValueKind::String, "Task identifier"),
    field(TASK_NAME, ValueKind::String, "Task title"),
    field(TASK_NOTE, ValueKind::String, "Task note body"),
    field(TASK_COMPLETED, ValueKind::Boolean, "Task is completed"),
    field(TASK_FLAGGED, ValueKind::Boolean, "Task is flagged"),
    field(TASK_IN_INBOX, ValueKind::Boolean, "Task is in the inbox"),
    field(TASK_BLOCKED, ValueKind::Boolean, "Task is blocked by a sequential predecessor"),
    field(TASK_AVAILABLE, ValueKind::Boolean, "Task can be worked on now"),
    field(TASK_DROPPED, ValueKind::Boolean, "Task is dropped"),
    field(
        TASK_TAG_STATUS_VALID,
        ValueKind::Boolean,
        "Task has no tags or at least one active or on-hold tag",
    ),
    field(
        TASK_CONTAINING_PROJECT,
        ValueKind::String,
        "Containing project, by identifier or name",
    ),
    field(TASK_REPETITION_RULE, ValueKind::Object, "Repetition rule"),
    field(TASK_DUE_DATE, ValueKind::Date, "Due date"),
    field(TASK_DEFER_DATE, ValueKind::Date, "Defer date"),
    field(TASK_PLANNED_DATE, ValueKind::Date, "Planned date"),
    field(TASK_COMPLETION_DATE, ValueKind::Date, "Completion date"),
    field(TASK_TAGS, ValueKind::Array, "Names of the task's tags"),
];

/// Finds a known field by its exact path.
pub fn lookup_field(path: &str) -> Option<&'static FieldDef> {
    KNOWN_FIELDS.iter().find(|f| f.path == path)
}

/// Returns true if the path resolves to a known or synthetic field.
pub fn is_known_field(path: &str) -> bool {
    lookup_field(path).is_some() || lookup_synthetic(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::synthetic::SYNTHETIC_FIELDS;

    #[test]
    fn test_known_fields_are_unique() {
        for (i, a) in KNOWN_FIELDS.iter().enumerate() {
            for b in &KNOWN_FIELDS[i + 1..] {
                assert_ne!(a.path, b.path, "duplicate field {}", a.path);
            }
        }
    }

    #[test]
    fn test_every_synthetic_field_is_known() {
        for def in SYNTHETIC_FIELDS {
            assert!(
                lookup_field(def.field).is_some(),
                "synthetic field {} has no kind",
                def.field
            );
        }
    }

    #[test]
    fn test_lookup_field() {
        assert_eq!(lookup_field(TASK_DUE_DATE).map(|f| f.kind), Some(ValueKind::Date));
        assert_eq!(lookup_field(TASK_TAGS).map(|f| f.kind), Some(ValueKind::Array));
        assert!(lookup_field("task.dueDat").is_none());
    }

    #[test]
    fn test_is_synthetic() {
        assert!(lookup_field(TASK_DROPPED).is_some_and(|f| f.is_synthetic()));
        assert!(lookup_field(TASK_FLAGGED).is_some_and(|f| !f.is_synthetic()));
    }
}
