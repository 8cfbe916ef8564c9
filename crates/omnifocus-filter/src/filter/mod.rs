//! Filter builder, validator and code emitters for OmniFocus task filters.
//!
//! A filter goes through three pure stages:
//!
//! 1. [`build`] turns a [`FilterSpec`] into a [`FilterNode`] tree.
//! 2. [`validate`] checks the tree and reports [`Diagnostic`]s.
//! 3. [`emit`] lowers a valid tree to a JavaScript boolean expression for a
//!    [`Target`] dialect.
//!
//! # Dialects
//!
//! - `jxa` - JavaScript for Automation, `task.dueDate()`
//! - `omnijs` - Omni Automation, `task.dueDate`
//!
//! # Example
//!
//! ```
//! use omnifocus_filter_rs::filter::{build, emit, validate, FilterSpec, Target};
//!
//! let spec = FilterSpec::from_json(r#"{"completed": false, "flagged": true}"#).unwrap();
//! let node = build(&spec);
//! assert!(validate(&node).valid);
//!
//! let jxa = emit(&node, Target::Jxa).unwrap();
//! assert_eq!(jxa, "(task.completed() === false && task.flagged() === true)");
//!
//! let omnijs = emit(&node, Target::OmniJs).unwrap();
//! assert_eq!(omnijs, "(task.completed === false && task.flagged === true)");
//! ```

mod ast;
mod builder;
pub mod emit;
mod error;
pub mod fields;
mod input;
pub mod synthetic;
mod validator;

pub use ast::{FilterNode, FilterValue, Operator};
pub use builder::{build, BuildContext, DateBias, FieldDefinition, FIELD_DEFINITIONS};
pub use emit::{emit, Dialect, Emitter, Target};
pub use error::{CompileError, EmitError, EmitResult};
pub use input::{FilterSpec, TagsOperator, TextOperator, UnknownOperator};
pub use validator::{validate, Diagnostic, DiagnosticKind, ValidationResult};
