//! Fields command implementation.

use omnifocus_filter_rs::filter::fields::KNOWN_FIELDS;

use super::{CommandContext, Result};
use crate::output::{format_fields_json, format_fields_table};

/// Executes the fields command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_fields_json(KNOWN_FIELDS)?);
    } else {
        print!("{}", format_fields_table(KNOWN_FIELDS, ctx.use_colors));
    }
    Ok(())
}
