//! The user-facing filter record consumed by the builder.
//!
//! Operator keys (`tagsOperator`, `textOperator`, `*DateOperator`) are matched
//! case-insensitively. An unrecognised operator is logged and treated as
//! unset, so the default for that predicate applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// How the tag set in a filter is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagsOperator {
    /// The task carries every listed tag.
    All,

    /// The task carries at least one listed tag.
    #[default]
    Any,

    /// The task carries none of the listed tags.
    None,
}

impl FromStr for TagsOperator {
    type Err = UnknownOperator;

    /// Accepts `ALL`/`AND`, `ANY`/`OR` and `NONE`/`NOT_IN` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" | "AND" => Ok(TagsOperator::All),
            "ANY" | "OR" => Ok(TagsOperator::Any),
            "NONE" | "NOT_IN" => Ok(TagsOperator::None),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

/// How the text search term is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextOperator {
    /// Case-insensitive substring match.
    #[default]
    Contains,

    /// Case-insensitive regular expression.
    Regex,
}

impl FromStr for TextOperator {
    type Err = UnknownOperator;

    /// Accepts `CONTAINS` and `REGEX`/`MATCHES` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTAINS" => Ok(TextOperator::Contains),
            "REGEX" | "MATCHES" => Ok(TextOperator::Regex),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

/// An operator name that matched no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

/// Deserializes an optional operator, dropping values that do not parse.
fn lenient_operator<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownOperator>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.parse() {
        Ok(op) => Some(op),
        Err(err) => {
            warn!(%err, "ignoring operator, using default");
            None
        }
    }))
}

/// A flat, partially-populated task filter.
///
/// Every predicate is optional; unset predicates do not constrain the result.
/// Unknown keys are ignored when deserializing.
///
/// # Example
///
/// ```
/// use omnifocus_filter_rs::filter::FilterSpec;
///
/// let spec: FilterSpec = serde_json::from_str(r#"{"flagged": true, "tags": ["home"]}"#).unwrap();
/// assert_eq!(spec.flagged, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    // ==================== Flags ====================
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_inbox: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_status_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_repetition_rule: Option<bool>,

    // ==================== References ====================
    /// Task identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Containing project, by identifier or name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Legacy name for `project_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    // ==================== Tags ====================
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_operator"
    )]
    pub tags_operator: Option<TagsOperator>,

    // ==================== Text ====================
    /// Search term matched against name and note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Legacy name for `text`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_operator"
    )]
    pub text_operator: Option<TextOperator>,

    // ==================== Dates ====================
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_date_operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_date_operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date_operator: Option<String>,

    /// Due soon or flagged. Claims `due_before` and `flagged`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_mode: Option<bool>,
}

impl FilterSpec {
    /// Parses a filter from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The search term, preferring `text` over the legacy `search`.
    pub fn search_term(&self) -> Option<&str> {
        non_empty(self.text.as_deref()).or_else(|| non_empty(self.search.as_deref()))
    }

    /// The project reference, preferring `project_id` over the legacy `project`.
    pub fn project_reference(&self) -> Option<&str> {
        non_empty(self.project_id.as_deref()).or_else(|| non_empty(self.project.as_deref()))
    }

    /// The tag set, if one with at least one tag is present.
    pub fn tag_set(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|tags| !tags.is_empty())
    }

    /// Returns true if no predicate is set.
    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }
}

/// Treats empty strings as unset.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
