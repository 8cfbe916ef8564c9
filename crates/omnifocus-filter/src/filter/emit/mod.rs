//! Lowering of filter trees to JavaScript boolean expressions.
//!
//! Both dialects share one traversal ([`Emitter`]). A [`Dialect`] only decides
//! how a dotted field path becomes an accessor expression and which synthetic
//! fields need a dedicated generator; everything else (boolean structure,
//! operator rendering, literal quoting) is common.
//!
//! The emitted text is a single expression with no trailing `;`. It expects a
//! `task` variable and, for tag checks, a `taskTags` array of tag names to be
//! bound by the surrounding script.

pub mod jxa;
pub mod omnijs;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ast::{FilterNode, FilterValue, Operator};
use super::error::{EmitError, EmitResult};
use super::fields::{lookup_field, ValueKind};
use super::synthetic::{lookup_synthetic, SyntheticEmitFn};

pub use jxa::Jxa;
pub use omnijs::OmniJs;

/// The scripting dialect to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// JavaScript for Automation: every property is read through a call.
    #[default]
    Jxa,
    /// Omni Automation: properties are read directly.
    #[serde(rename = "omnijs")]
    OmniJs,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Jxa => "jxa",
            Target::OmniJs => "omnijs",
        }
    }

    /// Returns the dialect implementation for this target.
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Target::Jxa => &Jxa,
            Target::OmniJs => &OmniJs,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jxa" => Ok(Target::Jxa),
            "omnijs" | "omni-js" | "omni" => Ok(Target::OmniJs),
            other => Err(format!("unknown target '{other}' (expected jxa or omnijs)")),
        }
    }
}

/// Capabilities that differ between the two dialects.
pub trait Dialect: Sync {
    /// The target this dialect emits.
    fn target(&self) -> Target;

    /// Renders a dotted field path as an accessor expression.
    fn accessor(&self, path: &str) -> String;

    /// Returns the dedicated generator for a synthetic field, if this dialect needs one.
    fn synthetic(&self, field: &str) -> Option<SyntheticEmitFn> {
        lookup_synthetic(field).and_then(|def| def.generator(self.target()))
    }
}

/// Lowers a tree to source text for the given target.
///
/// # Errors
///
/// Returns an [`EmitError`] if the tree uses an operator or value the target
/// cannot express. Trees produced by [`build`](super::build) never do.
///
/// # Example
///
/// ```
/// use omnifocus_filter_rs::filter::{emit, FilterNode, Operator, Target};
///
/// let node = FilterNode::comparison("task.flagged", Operator::Eq, true);
/// assert_eq!(emit(&node, Target::Jxa).unwrap(), "task.flagged() === true");
/// assert_eq!(emit(&node, Target::OmniJs).unwrap(), "task.flagged === true");
/// ```
pub fn emit(node: &FilterNode, target: Target) -> EmitResult<String> {
    Emitter::new(target.dialect()).emit(node)
}

/// Tree-walking code generator parameterized by a dialect.
pub struct Emitter<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> Emitter<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Emits a node and all of its descendants.
    pub fn emit(&self, node: &FilterNode) -> EmitResult<String> {
        match node {
            FilterNode::Literal { value } => Ok(value.to_string()),
            FilterNode::And { children } => self.emit_group(children, "&&", "true"),
            FilterNode::Or { children } => self.emit_group(children, "||", "false"),
            FilterNode::Not { child } => Ok(format!("!({})", self.emit(child)?)),
            FilterNode::Comparison {
                field,
                operator,
                value,
            } => self.emit_comparison(field, *operator, value),
            FilterNode::Exists { field, exists } => self.emit_exists(field, *exists),
        }
    }

    fn emit_group(&self, children: &[FilterNode], joiner: &str, neutral: &str) -> EmitResult<String> {
        if children.is_empty() {
            return Ok(neutral.to_string());
        }

        let parts = children
            .iter()
            .map(|child| self.emit(child))
            .collect::<EmitResult<Vec<_>>>()?;

        Ok(format!("({})", parts.join(&format!(" {joiner} "))))
    }

    fn emit_comparison(
        &self,
        field: &str,
        operator: Operator,
        value: &FilterValue,
    ) -> EmitResult<String> {
        if let Some(generate) = self.dialect.synthetic(field) {
            return generate(operator, value);
        }

        let def = lookup_field(field).ok_or_else(|| EmitError::UnknownField {
            field: field.to_string(),
        })?;
        let accessor = self.dialect.accessor(field);
        let dialect = self.dialect.target().as_str();
        let unsupported =
            || EmitError::unsupported_operator(field, operator, def.kind.as_str(), dialect);

        match operator {
            Operator::Eq | Operator::Ne => match def.kind {
                ValueKind::Boolean | ValueKind::String => Ok(format!(
                    "{accessor} {} {}",
                    equality_token(operator),
                    js_literal(value)
                )),
                _ => Err(unsupported()),
            },
            Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => {
                if def.kind != ValueKind::Date {
                    return Err(unsupported());
                }
                let date = expect_string(field, value)?;
                Ok(format!(
                    "{accessor} {operator} new Date({})",
                    js_string(date)
                ))
            }
            Operator::Contains => {
                if def.kind != ValueKind::String {
                    return Err(unsupported());
                }
                let needle = expect_string(field, value)?.to_lowercase();
                Ok(format!(
                    "({accessor} || \"\").toLowerCase().includes({})",
                    js_string(&needle)
                ))
            }
            Operator::Matches => {
                if def.kind != ValueKind::String {
                    return Err(unsupported());
                }
                let pattern = expect_string(field, value)?;
                Ok(format!(
                    "new RegExp({}, \"i\").test({accessor} || \"\")",
                    js_string(pattern)
                ))
            }
            Operator::AllMatch | Operator::AnyMatch => {
                if def.kind != ValueKind::Array {
                    return Err(unsupported());
                }
                let method = if operator == Operator::AllMatch {
                    "every"
                } else {
                    "some"
                };
                Ok(format!(
                    "{}.{method}(t => {accessor}.includes(t))",
                    js_string_array(&set_members(field, value)?)
                ))
            }
        }
    }

    fn emit_exists(&self, field: &str, exists: bool) -> EmitResult<String> {
        let dialect = self.dialect.target().as_str();
        if lookup_synthetic(field).is_some() {
            return Err(EmitError::UnsupportedExistence {
                field: field.to_string(),
                dialect,
            });
        }
        let def = lookup_field(field).ok_or_else(|| EmitError::UnknownField {
            field: field.to_string(),
        })?;
        if def.kind == ValueKind::Boolean {
            return Err(EmitError::UnsupportedExistence {
                field: field.to_string(),
                dialect,
            });
        }

        let accessor = self.dialect.accessor(field);
        let token = if exists { "!==" } else { "===" };
        Ok(format!("{accessor} {token} null"))
    }
}

fn equality_token(operator: Operator) -> &'static str {
    if operator == Operator::Ne {
        "!=="
    } else {
        "==="
    }
}

/// Renders a literal operand. JSON string and array syntax is valid JavaScript.
pub(crate) fn js_literal(value: &FilterValue) -> String {
    match value {
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::String(s) => js_string(s),
        FilterValue::Array(items) => js_string_array(items),
    }
}

pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn js_string_array(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

fn expect_string<'v>(field: &str, value: &'v FilterValue) -> EmitResult<&'v str> {
    value
        .as_str()
        .ok_or_else(|| EmitError::unsupported_value(field, "string", value.kind_name()))
}

/// Set operands accept a single string, coerced to a one-element set.
fn set_members(field: &str, value: &FilterValue) -> EmitResult<Vec<String>> {
    match value {
        FilterValue::Array(items) => Ok(items.clone()),
        FilterValue::String(s) => Ok(vec![s.clone()]),
        other => Err(EmitError::unsupported_value(field, "array", other.kind_name())),
    }
}

/// Applies a boolean comparison to a derived predicate expression.
///
/// `field == true` and `field != false` yield the predicate itself, the other
/// two combinations yield its negation.
pub(crate) fn bool_predicate(
    field: &str,
    operator: Operator,
    value: &FilterValue,
    predicate: &str,
    dialect: &'static str,
) -> EmitResult<String> {
    let expected = value
        .as_bool()
        .ok_or_else(|| EmitError::unsupported_value(field, "boolean", value.kind_name()))?;
    let positive = match operator {
        Operator::Eq => expected,
        Operator::Ne => !expected,
        other => {
            return Err(EmitError::unsupported_operator(
                field,
                other,
                "synthetic",
                dialect,
            ))
        }
    };

    if positive {
        Ok(predicate.to_string())
    } else {
        Ok(format!("!({predicate})"))
    }
}

/// Applies an equality comparison to a project match expression.
pub(crate) fn project_predicate(
    field: &str,
    operator: Operator,
    predicate: &str,
    dialect: &'static str,
) -> EmitResult<String> {
    match operator {
        Operator::Eq => Ok(predicate.to_string()),
        Operator::Ne => Ok(format!("!{predicate}")),
        other => Err(EmitError::unsupported_operator(
            field,
            other,
            "synthetic",
            dialect,
        )),
    }
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
