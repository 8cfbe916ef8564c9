use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use omnifocus_filter_rs::filter::CompileError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // Config and completions must work even when the config file is broken.
    let config = match &cli.command {
        Some(Commands::Config { .. } | Commands::Completions { .. }) | None => {
            load_config().unwrap_or_default()
        }
        Some(_) => load_config()?,
    };
    let ctx = CommandContext::new(cli, &config);

    match &cli.command {
        Some(Commands::Compile { input }) => commands::compile::execute(&ctx, input),
        Some(Commands::Check { input }) => commands::check::execute(&ctx, input),
        Some(Commands::Ast { input }) => commands::ast::execute(input),
        Some(Commands::Fields) => commands::fields::execute(&ctx),
        Some(Commands::Config { command }) => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
        },
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell);
            Ok(())
        }
        None => {
            if !ctx.quiet {
                println!("ofq - OmniFocus filter compiler");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Compile(CompileError::Rejected(_)) => "FILTER_REJECTED",
        CommandError::Compile(CompileError::Emit(_)) => "EMIT_ERROR",
        CommandError::Warnings(_) => "WARNINGS_AS_ERRORS",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Renders an error as JSON, attaching diagnostics for rejected filters.
fn error_json(e: &CommandError) -> String {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let CommandError::Compile(CompileError::Rejected(result)) = e {
        error["errors"] = serde_json::json!(result.errors);
        error["warnings"] = serde_json::json!(result.warnings);
    }

    let body = serde_json::json!({ "error": error });
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Compile(_) | CommandError::Warnings(_) => 1,
        CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Input(_) => 4,
        CommandError::Config(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnifocus_filter_rs::filter::{validate, EmitError, FilterNode, Operator};

    fn rejected() -> CommandError {
        let result = validate(&FilterNode::comparison("task.flag", Operator::Eq, true));
        CommandError::Compile(CompileError::Rejected(result))
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&rejected()), "FILTER_REJECTED");
        assert_eq!(
            error_code(&CommandError::Compile(CompileError::Emit(
                EmitError::UnknownField {
                    field: "x".to_string()
                }
            ))),
            "EMIT_ERROR"
        );
        assert_eq!(error_code(&CommandError::Input("bad".into())), "INPUT_ERROR");
        assert_eq!(error_code(&CommandError::Config("bad".into())), "CONFIG_ERROR");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_status(&rejected()), 1);
        assert_eq!(exit_status(&CommandError::Warnings(2)), 1);
        assert_eq!(exit_status(&CommandError::Io(std::io::Error::other("boom"))), 3);
        assert_eq!(exit_status(&CommandError::Input("x".into())), 4);
        assert_eq!(exit_status(&CommandError::Config("x".into())), 5);
    }

    #[test]
    fn test_error_json_includes_diagnostics() {
        let json: serde_json::Value = serde_json::from_str(&error_json(&rejected())).unwrap();
        assert_eq!(json["error"]["code"], "FILTER_REJECTED");
        assert_eq!(json["error"]["errors"][0]["kind"], "UNKNOWN_FIELD");
        assert_eq!(json["error"]["errors"][0]["suggestions"][0], "task.flagged");
    }

    #[test]
    fn test_error_json_plain_error() {
        let json: serde_json::Value =
            serde_json::from_str(&error_json(&CommandError::Input("empty input".into()))).unwrap();
        assert_eq!(json["error"]["message"], "invalid input: empty input");
        assert!(json["error"].get("errors").is_none());
    }
}
