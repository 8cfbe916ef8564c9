//! Output formatting utilities for the ofq CLI.
//!
//! - [`diagnostics`] - Validation results (check, compile warnings)
//! - [`fields`] - The known-field listing

mod diagnostics;
mod fields;

pub use diagnostics::{format_compiled_json, format_diagnostics_table, format_validation_json};
pub use fields::{format_fields_json, format_fields_table};
