//! AST command implementation.
//!
//! Prints the filter tree the builder produces, as JSON.

use super::input;
use super::Result;
use crate::cli::InputArgs;

/// Executes the ast command.
pub fn execute(args: &InputArgs) -> Result<()> {
    let tree = input::load(args)?.into_tree();
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}
