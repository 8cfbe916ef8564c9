//! Reading filters from files, stdin or the command line.

use std::fs;
use std::io::{self, Read};

use omnifocus_filter_rs::filter::{build, FilterNode, FilterSpec};
use tracing::debug;

use super::{CommandError, Result};
use crate::cli::InputArgs;

/// Path argument that means "read standard input".
const STDIN_MARKER: &str = "-";

/// Parsed command input.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    /// A declarative filter object.
    Spec(FilterSpec),
    /// A hand-written filter tree.
    Tree(FilterNode),
}

impl FilterInput {
    /// Returns the filter tree, building it from the filter object if needed.
    pub fn into_tree(self) -> FilterNode {
        match self {
            FilterInput::Spec(spec) => build(&spec),
            FilterInput::Tree(node) => node,
        }
    }
}

/// Reads and parses the input named by the arguments.
pub fn load(args: &InputArgs) -> Result<FilterInput> {
    let text = read_source(args)?;
    parse(&text, args.ast)
}

fn read_source(args: &InputArgs) -> Result<String> {
    if let Some(inline) = &args.filter {
        return Ok(inline.clone());
    }

    match args.file.as_deref() {
        None | Some(STDIN_MARKER) => {
            debug!("reading filter from stdin");
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => {
            debug!(path, "reading filter from file");
            Ok(fs::read_to_string(path)?)
        }
    }
}

/// Parses filter JSON, or filter tree JSON when `as_tree` is set.
pub fn parse(text: &str, as_tree: bool) -> Result<FilterInput> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::Input("empty input".to_string()));
    }

    if as_tree {
        serde_json::from_str(text)
            .map(FilterInput::Tree)
            .map_err(|e| CommandError::Input(format!("not a filter tree: {e}")))
    } else {
        FilterSpec::from_json(text)
            .map(FilterInput::Spec)
            .map_err(|e| CommandError::Input(format!("not a filter object: {e}")))
    }
}
