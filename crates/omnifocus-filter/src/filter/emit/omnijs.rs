//! Omni Automation dialect.
//!
//! Properties are read directly (`task.dueDate`), identifiers live under
//! `id.primaryKey`, and dropped/available/blocked are only observable through
//! the `Task.Status` enumeration.

use std::sync::LazyLock;

use regex::Regex;

use super::{bool_predicate, js_string, project_predicate, Dialect, Target};
use crate::filter::ast::{FilterValue, Operator};
use crate::filter::error::{EmitError, EmitResult};
use crate::filter::fields::{
    TASK_AVAILABLE, TASK_BLOCKED, TASK_CONTAINING_PROJECT, TASK_DROPPED, TASK_TAG_STATUS_VALID,
};

const DIALECT: &str = "omnijs";

/// Long runs of letters, digits, `-` and `_` are treated as project identifiers.
static PROJECT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("project id pattern is a valid regex")
});

/// Direct-property dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmniJs;

impl Dialect for OmniJs {
    fn target(&self) -> Target {
        Target::OmniJs
    }

    fn accessor(&self, path: &str) -> String {
        let mut segments = path.split('.');
        let mut out = segments.next().unwrap_or_default().to_string();
        for segment in segments {
            out.push('.');
            out.push_str(segment);
            if segment == "id" {
                out.push_str(".primaryKey");
            }
        }
        out
    }
}

/// Returns true if a project reference looks like an identifier rather than a name.
pub fn looks_like_project_id(reference: &str) -> bool {
    PROJECT_ID_PATTERN.is_match(reference)
}

pub(crate) fn dropped(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_DROPPED,
        operator,
        value,
        "task.taskStatus === Task.Status.Dropped",
        DIALECT,
    )
}

pub(crate) fn blocked(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_BLOCKED,
        operator,
        value,
        "task.taskStatus === Task.Status.Blocked",
        DIALECT,
    )
}

pub(crate) fn available(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_AVAILABLE,
        operator,
        value,
        "[Task.Status.Available, Task.Status.DueSoon, Task.Status.Next, Task.Status.Overdue]\
         .includes(task.taskStatus)",
        DIALECT,
    )
}

pub(crate) fn tag_status_valid(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_TAG_STATUS_VALID,
        operator,
        value,
        "(task.tags.length === 0 || \
         task.tags.some(t => t.status === Tag.Status.Active || t.status === Tag.Status.OnHold))",
        DIALECT,
    )
}

pub(crate) fn containing_project(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    let reference = value.as_str().ok_or_else(|| {
        EmitError::unsupported_value(TASK_CONTAINING_PROJECT, "string", value.kind_name())
    })?;
    let property = if looks_like_project_id(reference) {
        "id.primaryKey"
    } else {
        "name"
    };
    let predicate = format!(
        "(task.containingProject !== null && task.containingProject.{property} === {})",
        js_string(reference)
    );
    project_predicate(TASK_CONTAINING_PROJECT, operator, &predicate, DIALECT)
}
