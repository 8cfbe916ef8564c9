//! Command implementations for the ofq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod ast;
pub mod check;
pub mod compile;
pub mod completions;
pub mod config;
pub mod fields;
pub mod input;

use std::env;

use omnifocus_filter_rs::filter::{CompileError, Target};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The filter was rejected by validation or could not be emitted.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Warnings were reported while `warnings_as_errors` is on.
    #[error("{0} warning(s) reported with warnings_as_errors enabled")]
    Warnings(usize),

    /// The input is not a valid filter or filter tree.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Dialect to emit.
    pub target: Target,
    /// Whether warnings fail the command.
    pub warnings_as_errors: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let color_enabled = config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_enabled && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            target: cli
                .target
                .map(Target::from)
                .or(config.target)
                .unwrap_or_default(),
            warnings_as_errors: config.validation.warnings_as_errors.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_with_target(target: Option<Target>) -> Config {
        Config {
            target,
            ..Config::default()
        }
    }

    #[test]
    fn test_target_defaults_to_jxa() {
        let mut cli = Cli::parse_from(["ofq", "fields"]);
        cli.target = None;
        let ctx = CommandContext::new(&cli, &Config::default());
        assert_eq!(ctx.target, Target::Jxa);
    }

    #[test]
    fn test_config_target_used_without_flag() {
        let mut cli = Cli::parse_from(["ofq", "fields"]);
        cli.target = None;
        let ctx = CommandContext::new(&cli, &config_with_target(Some(Target::OmniJs)));
        assert_eq!(ctx.target, Target::OmniJs);
    }

    #[test]
    fn test_flag_overrides_config_target() {
        let cli = Cli::parse_from(["ofq", "--target", "jxa", "fields"]);
        let ctx = CommandContext::new(&cli, &config_with_target(Some(Target::OmniJs)));
        assert_eq!(ctx.target, Target::Jxa);
    }

    #[test]
    fn test_no_color_flag_disables_colors() {
        let cli = Cli::parse_from(["ofq", "--no-color", "fields"]);
        let ctx = CommandContext::new(&cli, &Config::default());
        assert!(!ctx.use_colors);
    }

    #[test]
    fn test_warnings_as_errors_from_config() {
        let cli = Cli::parse_from(["ofq", "fields"]);
        let mut config = Config::default();
        config.validation.warnings_as_errors = Some(true);
        assert!(CommandContext::new(&cli, &config).warnings_as_errors);
    }
}
