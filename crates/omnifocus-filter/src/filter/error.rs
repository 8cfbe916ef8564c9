//! Error types for filter emission and compilation.

use thiserror::Error;

use super::ast::Operator;
use super::validator::ValidationResult;

/// A specialized Result type for code emission.
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors raised while lowering a tree to source text.
///
/// Every variant means the tree does not match what the emitters support:
/// the builder never produces such trees, so these only surface for
/// hand-built input or a filter definition without a matching emitter case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmitError {
    /// The operator cannot be applied to this class of field.
    #[error("operator '{operator}' is not supported on {class} field '{field}' ({dialect})")]
    UnsupportedOperator {
        /// The field path.
        field: String,
        /// The rejected operator.
        operator: Operator,
        /// The field class, e.g. `string` or `synthetic`.
        class: String,
        /// The dialect being emitted.
        dialect: &'static str,
    },

    /// The field does not support existence checks.
    #[error("existence checks are not supported on field '{field}' ({dialect})")]
    UnsupportedExistence {
        /// The field path.
        field: String,
        /// The dialect being emitted.
        dialect: &'static str,
    },

    /// The operand has the wrong shape for the operator.
    #[error("field '{field}' expects a {expected} operand, found {found}")]
    UnsupportedValue {
        /// The field path.
        field: String,
        /// The expected value category.
        expected: &'static str,
        /// The value category that was supplied.
        found: &'static str,
    },

    /// The field is in neither registry.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// The field path.
        field: String,
    },
}

impl EmitError {
    /// Creates an unsupported operator error.
    pub fn unsupported_operator(
        field: impl Into<String>,
        operator: Operator,
        class: impl Into<String>,
        dialect: &'static str,
    ) -> Self {
        EmitError::UnsupportedOperator {
            field: field.into(),
            operator,
            class: class.into(),
            dialect,
        }
    }

    /// Creates an unsupported value error.
    pub fn unsupported_value(
        field: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        EmitError::UnsupportedValue {
            field: field.into(),
            expected,
            found,
        }
    }
}

/// Errors returned by the end-to-end compile entry points.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// Validation found errors; nothing was emitted.
    #[error("filter rejected: {}", summarize(.0))]
    Rejected(ValidationResult),

    /// The emitter could not lower a validated tree.
    #[error(transparent)]
    Emit(#[from] EmitError),
}

fn summarize(result: &ValidationResult) -> String {
    match result.errors.as_slice() {
        [] => "no errors reported".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}
