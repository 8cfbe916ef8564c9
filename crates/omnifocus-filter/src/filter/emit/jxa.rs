//! JavaScript for Automation dialect.
//!
//! JXA exposes every scriptable property as a method, so `task.dueDate`
//! becomes `task.dueDate()`. Task status is available through plain boolean
//! properties, and project references can only be matched by identifier.

use super::{bool_predicate, js_string, project_predicate, Dialect, Target};
use crate::filter::ast::{FilterValue, Operator};
use crate::filter::error::{EmitError, EmitResult};
use crate::filter::fields::{TASK_AVAILABLE, TASK_CONTAINING_PROJECT, TASK_TAG_STATUS_VALID};

const DIALECT: &str = "jxa";

/// Accessor-call dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jxa;

impl Dialect for Jxa {
    fn target(&self) -> Target {
        Target::Jxa
    }

    fn accessor(&self, path: &str) -> String {
        let mut segments = path.split('.');
        let mut out = segments.next().unwrap_or_default().to_string();
        for segment in segments {
            out.push('.');
            out.push_str(segment);
            out.push_str("()");
        }
        out
    }
}

pub(crate) fn available(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_AVAILABLE,
        operator,
        value,
        "(!task.completed() && !task.dropped() && !task.blocked() && \
         (task.deferDate() === null || task.deferDate() <= new Date()))",
        DIALECT,
    )
}

pub(crate) fn tag_status_valid(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    bool_predicate(
        TASK_TAG_STATUS_VALID,
        operator,
        value,
        "(task.tags().length === 0 || task.tags().some(t => !t.effectivelyHidden()))",
        DIALECT,
    )
}

pub(crate) fn containing_project(operator: Operator, value: &FilterValue) -> EmitResult<String> {
    let id = value.as_str().ok_or_else(|| {
        EmitError::unsupported_value(TASK_CONTAINING_PROJECT, "string", value.kind_name())
    })?;
    let predicate = format!(
        "(task.containingProject() !== null && task.containingProject().id() === {})",
        js_string(id)
    );
    project_predicate(TASK_CONTAINING_PROJECT, operator, &predicate, DIALECT)
}
