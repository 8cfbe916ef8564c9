//! Abstract Syntax Tree (AST) for compiled task filters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators that can appear in a [`FilterNode::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Strict equality.
    #[serde(rename = "==")]
    Eq,

    /// Strict inequality.
    #[serde(rename = "!=")]
    Ne,

    /// Less than.
    #[serde(rename = "<")]
    Lt,

    /// Greater than.
    #[serde(rename = ">")]
    Gt,

    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,

    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,

    /// Case-insensitive substring containment.
    #[serde(rename = "contains")]
    Contains,

    /// Case-insensitive regular expression match.
    #[serde(rename = "matches")]
    Matches,

    /// Every value in the literal set is present in the collection.
    #[serde(rename = "all")]
    AllMatch,

    /// At least one value in the literal set is present in the collection.
    #[serde(rename = "any")]
    AnyMatch,
}

impl Operator {
    /// Returns true for `<`, `>`, `<=` and `>=`.
    pub fn is_ordering(self) -> bool {
        matches!(self, Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge)
    }

    /// Returns true for the set-membership operators.
    pub fn is_set_match(self) -> bool {
        matches!(self, Operator::AllMatch | Operator::AnyMatch)
    }

    /// Returns true for the text operators (substring and regex).
    pub fn is_text_match(self) -> bool {
        matches!(self, Operator::Contains | Operator::Matches)
    }

    /// The operator token as written in the AST wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Contains => "contains",
            Operator::Matches => "matches",
            Operator::AllMatch => "all",
            Operator::AnyMatch => "any",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal operand on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A boolean flag.
    Bool(bool),

    /// A number. No builder output produces one, but hand-built trees may.
    Number(serde_json::Number),

    /// A plain string or an ISO-8601 date string.
    String(String),

    /// A list of strings (tag names).
    Array(Vec<String>),
}

impl FilterValue {
    /// Short name of the value category, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterValue::Bool(_) => "boolean",
            FilterValue::Number(_) => "number",
            FilterValue::String(_) => "string",
            FilterValue::Array(_) => "array",
        }
    }

    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::String(s) => write!(f, "{s:?}"),
            FilterValue::Array(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        FilterValue::Array(value)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(value: Vec<&str>) -> Self {
        FilterValue::Array(value.into_iter().map(str::to_string).collect())
    }
}

/// Represents a compiled filter expression.
///
/// A `FilterNode` tree is built fresh for every filter, never mutated after
/// construction, and independent of the dialect it is later emitted to.
/// Field names are dotted logical paths such as `task.dueDate`, or the
/// collection field `taskTags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterNode {
    /// A constant truth value.
    Literal {
        /// The constant.
        value: bool,
    },

    /// `field <operator> value`.
    Comparison {
        /// Dotted logical field path.
        field: String,
        /// The comparison operator.
        operator: Operator,
        /// The right-hand operand.
        value: FilterValue,
    },

    /// The field has (or has not) a present value.
    Exists {
        /// Dotted logical field path.
        field: String,
        /// `true` to require a value, `false` to require its absence.
        exists: bool,
    },

    /// Logical AND of any number of children.
    And {
        /// Conjuncts, in order.
        children: Vec<FilterNode>,
    },

    /// Logical OR of any number of children.
    Or {
        /// Disjuncts, in order.
        children: Vec<FilterNode>,
    },

    /// Logical NOT of a single child.
    Not {
        /// The negated node.
        child: Box<FilterNode>,
    },
}

impl FilterNode {
    /// Creates a literal node.
    pub fn literal(value: bool) -> Self {
        FilterNode::Literal { value }
    }

    /// Creates a comparison node.
    ///
    /// # Example
    ///
    /// ```
    /// use omnifocus_filter_rs::filter::{FilterNode, Operator};
    ///
    /// let node = FilterNode::comparison("task.flagged", Operator::Eq, true);
    /// assert_eq!(node.field(), Some("task.flagged"));
    /// ```
    pub fn comparison(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        FilterNode::Comparison {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an existence check.
    pub fn exists(field: impl Into<String>, exists: bool) -> Self {
        FilterNode::Exists {
            field: field.into(),
            exists,
        }
    }

    /// Creates an AND node from the given children.
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::And { children }
    }

    /// Creates an OR node from the given children.
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Or { children }
    }

    /// Creates a NOT node.
    pub fn negate(child: FilterNode) -> Self {
        FilterNode::Not {
            child: Box::new(child),
        }
    }

    /// Returns the field path for comparison and existence nodes.
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterNode::Comparison { field, .. } | FilterNode::Exists { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Name of the node shape, used in diagnostics and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterNode::Literal { .. } => "literal",
            FilterNode::Comparison { .. } => "comparison",
            FilterNode::Exists { .. } => "exists",
            FilterNode::And { .. } => "and",
            FilterNode::Or { .. } => "or",
            FilterNode::Not { .. } => "not",
        }
    }

    /// Counts the nodes in the tree, including this one.
    pub fn node_count(&self) -> usize {
        match self {
            FilterNode::And { children } | FilterNode::Or { children } => {
                1 + children.iter().map(FilterNode::node_count).sum::<usize>()
            }
            FilterNode::Not { child } => 1 + child.node_count(),
            _ => 1,
        }
    }
}
