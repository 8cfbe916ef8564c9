//! Compiles OmniFocus task filters into validated script predicates.
//!
//! This crate turns a declarative [`FilterSpec`](filter::FilterSpec) into a
//! boolean expression for either JavaScript for Automation or Omni
//! Automation. It does not run anything: the output is source text plus the
//! diagnostics gathered on the way. Callers embed the expression in a script
//! that binds `task` (and `taskTags` for tag filters).

use serde::Serialize;
use tracing::debug;

pub mod filter;

use filter::{
    build, emit, validate, CompileError, Diagnostic, FilterNode, FilterSpec, Target,
};

/// The result of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    /// The tree the expression was emitted from.
    pub ast: FilterNode,
    /// The dialect the expression targets.
    pub target: Target,
    /// Single-line boolean expression, without a trailing `;`.
    pub expression: String,
    /// Advisory findings; the filter was still compiled.
    pub warnings: Vec<Diagnostic>,
}

/// Builds, validates and emits a filter.
///
/// # Errors
///
/// Returns [`CompileError::Rejected`] if validation reports errors, and
/// [`CompileError::Emit`] if the tree cannot be expressed in the target.
///
/// # Example
///
/// ```
/// use omnifocus_filter_rs::compile;
/// use omnifocus_filter_rs::filter::{FilterSpec, Target};
///
/// let compiled = compile(&FilterSpec::default(), Target::OmniJs).unwrap();
/// assert_eq!(compiled.expression, "true");
/// ```
pub fn compile(filter: &FilterSpec, target: Target) -> Result<Compiled, CompileError> {
    compile_node(build(filter), target)
}

/// Validates and emits an already-built tree.
///
/// # Errors
///
/// Same as [`compile`].
pub fn compile_node(ast: FilterNode, target: Target) -> Result<Compiled, CompileError> {
    let result = validate(&ast);
    if !result.valid {
        debug!(errors = result.errors.len(), "filter rejected");
        return Err(CompileError::Rejected(result));
    }

    let expression = emit(&ast, target)?;
    debug!(dialect = %target, nodes = ast.node_count(), "filter compiled");

    Ok(Compiled {
        ast,
        target,
        expression,
        warnings: result.warnings,
    })
}
