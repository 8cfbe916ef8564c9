//! Check command implementation.
//!
//! Validates a filter without emitting it and prints every diagnostic.

use omnifocus_filter_rs::filter::{validate, CompileError, ValidationResult};
use tracing::debug;

use super::input;
use super::{CommandContext, CommandError, Result};
use crate::cli::InputArgs;
use crate::output::{format_diagnostics_table, format_validation_json};

/// Executes the check command.
///
/// Diagnostics go to stdout; a rejected filter still ends in an error so the
/// exit status reflects the outcome.
pub fn execute(ctx: &CommandContext, args: &InputArgs) -> Result<()> {
    let tree = input::load(args)?.into_tree();
    let result = validate(&tree);
    debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "filter checked"
    );

    if ctx.json_output {
        println!("{}", format_validation_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_diagnostics_table(&result, ctx.use_colors));
    }

    verdict(ctx, result)
}

fn verdict(ctx: &CommandContext, result: ValidationResult) -> Result<()> {
    if !result.valid {
        return Err(CompileError::Rejected(result).into());
    }
    if ctx.warnings_as_errors && result.has_warnings() {
        return Err(CommandError::Warnings(result.warnings.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnifocus_filter_rs::filter::{FilterNode, Operator, Target};

    fn ctx(warnings_as_errors: bool) -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            target: Target::Jxa,
            warnings_as_errors,
        }
    }

    #[test]
    fn test_verdict_valid() {
        let result = validate(&FilterNode::comparison("task.flagged", Operator::Eq, true));
        assert!(verdict(&ctx(false), result).is_ok());
    }

    #[test]
    fn test_verdict_rejected() {
        let result = validate(&FilterNode::comparison("task.nope", Operator::Eq, true));
        assert!(matches!(
            verdict(&ctx(false), result),
            Err(CommandError::Compile(CompileError::Rejected(_)))
        ));
    }

    #[test]
    fn test_verdict_warnings() {
        let node = FilterNode::and(vec![]);
        assert!(verdict(&ctx(false), validate(&node)).is_ok());
        assert!(matches!(
            verdict(&ctx(true), validate(&node)),
            Err(CommandError::Warnings(1))
        ));
    }
}
