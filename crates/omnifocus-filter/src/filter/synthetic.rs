//! Registry of synthetic fields.
//!
//! A synthetic field is a logical predicate with no plain backing property in
//! at least one dialect. Each entry carries one generator per dialect; `None`
//! means the dialect exposes the field directly and the generic accessor path
//! is used instead.

use super::ast::{FilterValue, Operator};
use super::emit::{jxa, omnijs, Target};
use super::error::EmitResult;
use super::fields::{
    TASK_AVAILABLE, TASK_BLOCKED, TASK_CONTAINING_PROJECT, TASK_DROPPED, TASK_TAG_STATUS_VALID,
};

/// Generates a complete boolean expression for one comparison on a synthetic field.
pub type SyntheticEmitFn = fn(Operator, &FilterValue) -> EmitResult<String>;

/// Per-dialect code generators for one synthetic field.
#[derive(Clone, Copy)]
pub struct SyntheticFieldDef {
    pub field: &'static str,
    pub jxa: Option<SyntheticEmitFn>,
    pub omnijs: Option<SyntheticEmitFn>,
}

impl SyntheticFieldDef {
    /// Returns the generator for the given dialect, if it needs one.
    pub fn generator(&self, target: Target) -> Option<SyntheticEmitFn> {
        match target {
            Target::Jxa => self.jxa,
            Target::OmniJs => self.omnijs,
        }
    }
}

pub static SYNTHETIC_FIELDS: &[SyntheticFieldDef] = &[
    SyntheticFieldDef {
        field: TASK_DROPPED,
        jxa: None,
        omnijs: Some(omnijs::dropped),
    },
    SyntheticFieldDef {
        field: TASK_AVAILABLE,
        jxa: Some(jxa::available),
        omnijs: Some(omnijs::available),
    },
    SyntheticFieldDef {
        field: TASK_BLOCKED,
        jxa: None,
        omnijs: Some(omnijs::blocked),
    },
    SyntheticFieldDef {
        field: TASK_TAG_STATUS_VALID,
        jxa: Some(jxa::tag_status_valid),
        omnijs: Some(omnijs::tag_status_valid),
    },
    SyntheticFieldDef {
        field: TASK_CONTAINING_PROJECT,
        jxa: Some(jxa::containing_project),
        omnijs: Some(omnijs::containing_project),
    },
];

/// Finds the synthetic definition for a field path.
pub fn lookup_synthetic(field: &str) -> Option<&'static SyntheticFieldDef> {
    SYNTHETIC_FIELDS.iter().find(|def| def.field == field)
}
