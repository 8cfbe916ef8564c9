//! Compile command implementation.
//!
//! Builds, validates and emits a filter, printing the expression on stdout.

use omnifocus_filter_rs::{compile_node, Compiled};
use tracing::debug;

use super::input::{self, FilterInput};
use super::{CommandContext, CommandError, Result};
use crate::cli::InputArgs;
use crate::output::format_compiled_json;

/// Executes the compile command.
pub fn execute(ctx: &CommandContext, args: &InputArgs) -> Result<()> {
    let compiled = run(ctx, input::load(args)?)?;

    if ctx.json_output {
        println!("{}", format_compiled_json(&compiled)?);
        return Ok(());
    }

    if !ctx.quiet {
        for warning in &compiled.warnings {
            eprintln!("warning: {warning}");
        }
    }
    println!("{}", compiled.expression);
    Ok(())
}

/// Compiles parsed input for the context's target.
///
/// Warnings fail the compilation when `warnings_as_errors` is set.
pub fn run(ctx: &CommandContext, input: FilterInput) -> Result<Compiled> {
    let tree = input.into_tree();
    debug!(dialect = %ctx.target, "compiling filter");

    let compiled = compile_node(tree, ctx.target)?;
    if ctx.warnings_as_errors && !compiled.warnings.is_empty() {
        return Err(CommandError::Warnings(compiled.warnings.len()));
    }
    Ok(compiled)
}
