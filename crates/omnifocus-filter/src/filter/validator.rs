//! Static checks over a filter tree.
//!
//! Validation never fails: every problem is reported as a [`Diagnostic`].
//! Errors make the result invalid and must stop emission; warnings are
//! advisory.
//!
//! Contradiction and tautology detection only look at the direct children of
//! the root `And`/`Or`. A conflict inside a nested group is not reported.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::debug;

use super::ast::{FilterNode, FilterValue, Operator};
use super::fields::{is_known_field, lookup_field, ValueKind, KNOWN_FIELDS};

/// Maximum number of field name suggestions attached to an unknown field.
const MAX_SUGGESTIONS: usize = 3;

/// Machine-readable diagnostic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    UnknownField,
    TypeMismatch,
    Contradiction,
    InvalidNode,
    Tautology,
    EmptyNode,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownField => "UNKNOWN_FIELD",
            DiagnosticKind::TypeMismatch => "TYPE_MISMATCH",
            DiagnosticKind::Contradiction => "CONTRADICTION",
            DiagnosticKind::InvalidNode => "INVALID_NODE",
            DiagnosticKind::Tautology => "TAUTOLOGY",
            DiagnosticKind::EmptyNode => "EMPTY_NODE",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Location in the tree: `$` is the root, `$.children[1].child` a descendant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Close field names, for unknown fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: impl Into<String>, path: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Some(path.to_string()),
            suggestions: Vec::new(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at {path})")?;
        }
        if !self.suggestions.is_empty() {
            write!(f, ". Did you mean: {}?", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of validating a tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns true if any warning was reported.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the errors of the given kind.
    pub fn errors_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(move |d| d.kind == kind)
    }

    /// Returns the warnings of the given kind.
    pub fn warnings_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter().filter(move |d| d.kind == kind)
    }
}

/// Validates a filter tree.
///
/// # Example
///
/// ```
/// use omnifocus_filter_rs::filter::{validate, FilterNode, Operator};
///
/// let node = FilterNode::comparison("task.flag", Operator::Eq, true);
/// let result = validate(&node);
/// assert!(!result.valid);
/// assert_eq!(result.errors[0].suggestions, vec!["task.flagged".to_string()]);
/// ```
pub fn validate(node: &FilterNode) -> ValidationResult {
    let mut validator = Validator::default();
    validator.visit(node, "$");
    validator.check_contradictions(node);
    validator.check_tautologies(node);

    let result = validator.finish();
    debug!(
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "filter validated"
    );
    result
}

#[derive(Default)]
struct Validator {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Validator {
    fn finish(self) -> ValidationResult {
        ValidationResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    // ==================== Per-node Checks ====================

    fn visit(&mut self, node: &FilterNode, path: &str) {
        match node {
            FilterNode::Literal { .. } => {}
            FilterNode::Comparison {
                field,
                operator,
                value,
            } => {
                if self.check_field(field, path) {
                    self.check_operand(field, *operator, value, path);
                }
            }
            FilterNode::Exists { field, .. } => {
                self.check_field(field, path);
            }
            FilterNode::And { children } | FilterNode::Or { children } => {
                if children.is_empty() {
                    self.warn(Diagnostic::new(
                        DiagnosticKind::EmptyNode,
                        format!("empty '{}' group", node.kind_name()),
                        path,
                    ));
                }
                for (i, child) in children.iter().enumerate() {
                    self.visit(child, &format!("{path}.children[{i}]"));
                }
            }
            FilterNode::Not { child } => self.visit(child, &format!("{path}.child")),
        }
    }

    /// Checks that the field path is well formed and known. Returns true if
    /// the operand checks should run.
    fn check_field(&mut self, field: &str, path: &str) -> bool {
        if field.is_empty() || field.split('.').any(str::is_empty) {
            self.error(Diagnostic::new(
                DiagnosticKind::InvalidNode,
                format!("malformed field path '{field}'"),
                path,
            ));
            return false;
        }

        if !is_known_field(field) {
            let mut diagnostic = Diagnostic::new(
                DiagnosticKind::UnknownField,
                format!("unknown field '{field}'"),
                path,
            );
            diagnostic.suggestions = suggest_fields(field);
            self.error(diagnostic);
            return false;
        }

        true
    }

    fn check_operand(&mut self, field: &str, operator: Operator, value: &FilterValue, path: &str) {
        let shape_ok = match operator {
            op if op.is_set_match() => {
                matches!(value, FilterValue::Array(_) | FilterValue::String(_))
            }
            op if op.is_text_match() => matches!(value, FilterValue::String(_)),
            op if op.is_ordering() => {
                matches!(value, FilterValue::String(_) | FilterValue::Number(_))
            }
            _ => true,
        };
        if !shape_ok {
            self.error(Diagnostic::new(
                DiagnosticKind::InvalidNode,
                format!(
                    "operator '{operator}' cannot take a {} operand",
                    value.kind_name()
                ),
                path,
            ));
            return;
        }

        let Some(def) = lookup_field(field) else {
            return;
        };
        if let Some(reason) = type_mismatch(def.kind, operator, value) {
            self.error(Diagnostic::new(
                DiagnosticKind::TypeMismatch,
                format!("field '{field}' {reason}"),
                path,
            ));
        }
    }

    // ==================== Root Group Checks ====================

    fn check_contradictions(&mut self, node: &FilterNode) {
        let FilterNode::And { children } = node else {
            return;
        };

        for (field, values) in equality_assertions(children) {
            if values.len() > 1 {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                self.error(Diagnostic::new(
                    DiagnosticKind::Contradiction,
                    format!(
                        "field '{field}' must equal {} at the same time; the filter can never match",
                        rendered.join(" and ")
                    ),
                    "$",
                ));
            }
        }
    }

    fn check_tautologies(&mut self, node: &FilterNode) {
        let FilterNode::Or { children } = node else {
            return;
        };

        for (field, values) in equality_assertions(children) {
            let has_true = values.contains(&&FilterValue::Bool(true));
            let has_false = values.contains(&&FilterValue::Bool(false));
            if has_true && has_false {
                self.warn(Diagnostic::new(
                    DiagnosticKind::Tautology,
                    format!("field '{field}' is tested for both true and false; the group always matches"),
                    "$",
                ));
            }
        }
    }
}

/// Collects the distinct values each field is compared with `==` against,
/// among the given siblings, in order of first appearance.
fn equality_assertions(children: &[FilterNode]) -> Vec<(&str, Vec<&FilterValue>)> {
    let mut assertions: Vec<(&str, Vec<&FilterValue>)> = Vec::new();

    for child in children {
        let FilterNode::Comparison {
            field,
            operator: Operator::Eq,
            value,
        } = child
        else {
            continue;
        };

        match assertions.iter_mut().find(|(f, _)| *f == field.as_str()) {
            Some((_, values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => assertions.push((field.as_str(), vec![value])),
        }
    }

    assertions
}

/// Describes why a value does not fit a field kind, if it does not.
fn type_mismatch(kind: ValueKind, operator: Operator, value: &FilterValue) -> Option<String> {
    let found = value.kind_name();
    match (kind, value) {
        (ValueKind::Boolean, FilterValue::Bool(_)) => None,
        (ValueKind::String, FilterValue::String(_)) => None,
        (ValueKind::Date, FilterValue::String(s)) => {
            if is_iso_date(s) {
                None
            } else {
                Some(format!("expects an ISO-8601 date, found '{s}'"))
            }
        }
        (ValueKind::Array, _) if operator.is_set_match() => None,
        (ValueKind::Array, FilterValue::Array(_)) => None,
        (ValueKind::Object, _) => Some("supports existence checks only".to_string()),
        (kind, _) => Some(format!("expects a {kind} value, found {found}")),
    }
}

/// Accepts calendar dates and date-times, local or with an extended or
/// basic-format offset, with optional fractional seconds.
fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Suggests known fields whose name overlaps the unknown one.
///
/// A candidate qualifies when its path contains the last segment of the
/// unknown field, or that segment contains the candidate's last segment.
/// Qualifying candidates are ranked by Jaro-Winkler similarity.
fn suggest_fields(unknown: &str) -> Vec<String> {
    let needle = last_segment(unknown).to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&str, f64)> = KNOWN_FIELDS
        .iter()
        .filter_map(|def| {
            let candidate = def.path.to_lowercase();
            let segment = last_segment(&candidate);
            let overlaps = candidate.contains(&needle) || needle.contains(segment);
            overlaps.then(|| (def.path, jaro_winkler(&needle, segment)))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(path, _)| path.to_string())
        .collect()
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
