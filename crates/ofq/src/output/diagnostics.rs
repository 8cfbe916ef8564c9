//! Diagnostic output formatting.

use omnifocus_filter_rs::filter::{Diagnostic, ValidationResult};
use omnifocus_filter_rs::Compiled;
use owo_colors::OwoColorize;

/// Formats a validation result as JSON.
pub fn format_validation_json(result: &ValidationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Formats a compilation result as JSON.
pub fn format_compiled_json(compiled: &Compiled) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(compiled)
}

/// Formats errors and warnings as a table, followed by a summary line.
pub fn format_diagnostics_table(result: &ValidationResult, use_colors: bool) -> String {
    if result.errors.is_empty() && result.warnings.is_empty() {
        return "No problems found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<8} {:<14} {:<20} {}", "Level", "Kind", "Path", "Message");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for diagnostic in &result.errors {
        push_row(&mut output, "error", diagnostic, use_colors);
    }
    for diagnostic in &result.warnings {
        push_row(&mut output, "warning", diagnostic, use_colors);
    }

    output.push('\n');
    output.push_str(&summary(result));
    output.push('\n');
    output
}

fn push_row(output: &mut String, level: &str, diagnostic: &Diagnostic, use_colors: bool) {
    let padded = format!("{level:<8}");
    let level = match (use_colors, level) {
        (false, _) => padded,
        (true, "error") => padded.red().bold().to_string(),
        (true, _) => padded.yellow().to_string(),
    };
    let path = diagnostic.path.as_deref().unwrap_or("-");

    output.push_str(&format!(
        "{} {:<14} {:<20} {}\n",
        level,
        diagnostic.kind.as_str(),
        path,
        diagnostic.message
    ));

    if !diagnostic.suggestions.is_empty() {
        let hint = format!("did you mean: {}", diagnostic.suggestions.join(", "));
        if use_colors {
            output.push_str(&format!("{:<44} {}\n", "", hint.cyan()));
        } else {
            output.push_str(&format!("{:<44} {}\n", "", hint));
        }
    }
}

fn summary(result: &ValidationResult) -> String {
    format!(
        "{} {}, {} {}",
        result.errors.len(),
        plural(result.errors.len(), "error", "errors"),
        result.warnings.len(),
        plural(result.warnings.len(), "warning", "warnings"),
    )
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
