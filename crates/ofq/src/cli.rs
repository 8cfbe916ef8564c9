//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the ofq CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};
use omnifocus_filter_rs::filter::Target;

/// ofq - Compile OmniFocus task filters into script predicates
#[derive(Parser, Debug)]
#[command(name = "ofq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Script dialect to emit (default: from config, else jxa)
    #[arg(short, long, global = true, value_enum, env = "OFQ_TARGET")]
    pub target: Option<TargetArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a filter into a boolean expression
    #[command(alias = "c")]
    Compile {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate a filter and print its diagnostics
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the filter tree as JSON
    Ast {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the fields a filter tree may reference
    Fields,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Where a command reads its filter from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// File containing the filter JSON ("-" or omitted reads stdin)
    pub file: Option<String>,

    /// Inline filter JSON
    #[arg(short, long, conflicts_with = "file")]
    pub filter: Option<String>,

    /// Treat the input as a filter tree instead of a filter object
    #[arg(long)]
    pub ast: bool,
}

/// Target dialects accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetArg {
    /// JavaScript for Automation
    Jxa,
    /// Omni Automation
    #[value(name = "omnijs", alias = "omni")]
    OmniJs,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Jxa => Target::Jxa,
            TargetArg::OmniJs => Target::OmniJs,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,
}
