//! Construction of filter trees from [`FilterSpec`] records.
//!
//! The builder walks a table of [`FieldDefinition`]s. Each definition looks at
//! the filter, and either declines or produces one node; the produced nodes
//! are combined with an implicit AND.
//!
//! Composite definitions may *claim* input keys. Claims are collected for the
//! whole table before any node is built, and a claimed key is ignored by the
//! definitions that would otherwise handle it on their own. Today mode is the
//! only composite: it claims `flagged` and `dueBefore`.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use super::ast::{FilterNode, Operator};
use super::fields::{
    TASK_AVAILABLE, TASK_BLOCKED, TASK_COMPLETED, TASK_COMPLETION_DATE, TASK_CONTAINING_PROJECT,
    TASK_DEFER_DATE, TASK_DROPPED, TASK_DUE_DATE, TASK_FLAGGED, TASK_ID, TASK_IN_INBOX, TASK_NAME,
    TASK_NOTE, TASK_PLANNED_DATE, TASK_REPETITION_RULE, TASK_TAGS, TASK_TAG_STATUS_VALID,
};
use super::input::{non_empty, FilterSpec, TagsOperator, TextOperator};

const FLAGGED_KEY: &str = "flagged";
const DUE_BEFORE_KEY: &str = "dueBefore";

/// State shared by all definitions during one build.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub filter: &'a FilterSpec,
    consumed: BTreeSet<&'static str>,
}

impl<'a> BuildContext<'a> {
    fn new(filter: &'a FilterSpec) -> Self {
        let consumed = FIELD_DEFINITIONS
            .iter()
            .flat_map(|def| (def.claims)(filter).iter().copied())
            .collect();
        Self { filter, consumed }
    }

    /// Returns true if a composite definition claimed the input key.
    pub fn is_consumed(&self, key: &str) -> bool {
        self.consumed.contains(key)
    }
}

/// One row of the builder table.
pub struct FieldDefinition {
    /// Name used in logs.
    pub name: &'static str,
    /// Filter keys this definition reads.
    pub inputs: &'static [&'static str],
    /// Tree fields this definition produces.
    pub touches: &'static [&'static str],
    claims: fn(&FilterSpec) -> &'static [&'static str],
    build: fn(&BuildContext<'_>) -> Option<FilterNode>,
}

impl FieldDefinition {
    /// Input keys this definition claims for the given filter.
    pub fn claims(&self, filter: &FilterSpec) -> &'static [&'static str] {
        (self.claims)(filter)
    }
}

fn claims_nothing(_: &FilterSpec) -> &'static [&'static str] {
    &[]
}

/// The builder table, in output order.
pub static FIELD_DEFINITIONS: &[FieldDefinition] = &[
    FieldDefinition {
        name: "todayMode",
        inputs: &["todayMode", DUE_BEFORE_KEY, "dueDateOperator", FLAGGED_KEY],
        touches: &[TASK_DUE_DATE, TASK_FLAGGED],
        claims: claims_today,
        build: build_today,
    },
    FieldDefinition {
        name: "id",
        inputs: &["id"],
        touches: &[TASK_ID],
        claims: claims_nothing,
        build: build_id,
    },
    FieldDefinition {
        name: "completed",
        inputs: &["completed"],
        touches: &[TASK_COMPLETED],
        claims: claims_nothing,
        build: build_completed,
    },
    FieldDefinition {
        name: "flagged",
        inputs: &[FLAGGED_KEY],
        touches: &[TASK_FLAGGED],
        claims: claims_nothing,
        build: build_flagged,
    },
    FieldDefinition {
        name: "blocked",
        inputs: &["blocked"],
        touches: &[TASK_BLOCKED],
        claims: claims_nothing,
        build: build_blocked,
    },
    FieldDefinition {
        name: "available",
        inputs: &["available"],
        touches: &[TASK_AVAILABLE],
        claims: claims_nothing,
        build: build_available,
    },
    FieldDefinition {
        name: "inInbox",
        inputs: &["inInbox"],
        touches: &[TASK_IN_INBOX],
        claims: claims_nothing,
        build: build_in_inbox,
    },
    FieldDefinition {
        name: "dropped",
        inputs: &["dropped"],
        touches: &[TASK_DROPPED],
        claims: claims_nothing,
        build: build_dropped,
    },
    FieldDefinition {
        name: "tagStatusValid",
        inputs: &["tagStatusValid"],
        touches: &[TASK_TAG_STATUS_VALID],
        claims: claims_nothing,
        build: build_tag_status_valid,
    },
    FieldDefinition {
        name: "hasRepetitionRule",
        inputs: &["hasRepetitionRule"],
        touches: &[TASK_REPETITION_RULE],
        claims: claims_nothing,
        build: build_has_repetition_rule,
    },
    FieldDefinition {
        name: "project",
        inputs: &["projectId", "project"],
        touches: &[TASK_CONTAINING_PROJECT],
        claims: claims_nothing,
        build: build_project,
    },
    FieldDefinition {
        name: "tags",
        inputs: &["tags", "tagsOperator"],
        touches: &[TASK_TAGS],
        claims: claims_nothing,
        build: build_tags,
    },
    FieldDefinition {
        name: "text",
        inputs: &["text", "search", "textOperator"],
        touches: &[TASK_NAME, TASK_NOTE],
        claims: claims_nothing,
        build: build_text,
    },
    FieldDefinition {
        name: "dueDate",
        inputs: &["dueAfter", DUE_BEFORE_KEY, "dueDateOperator"],
        touches: &[TASK_DUE_DATE],
        claims: claims_nothing,
        build: build_due,
    },
    FieldDefinition {
        name: "deferDate",
        inputs: &["deferAfter", "deferBefore", "deferDateOperator"],
        touches: &[TASK_DEFER_DATE],
        claims: claims_nothing,
        build: build_defer,
    },
    FieldDefinition {
        name: "plannedDate",
        inputs: &["plannedAfter", "plannedBefore", "plannedDateOperator"],
        touches: &[TASK_PLANNED_DATE],
        claims: claims_nothing,
        build: build_planned,
    },
    FieldDefinition {
        name: "completionDate",
        inputs: &["completionAfter", "completionBefore", "completionDateOperator"],
        touches: &[TASK_COMPLETION_DATE],
        claims: claims_nothing,
        build: build_completion,
    },
];

/// Builds the filter tree for a filter record.
///
/// Never fails: a filter with no active predicate yields `Literal(true)`, a
/// single predicate yields its node unchanged, and several are wrapped in an
/// `And` in table order.
///
/// # Example
///
/// ```
/// use omnifocus_filter_rs::filter::{build, FilterNode, FilterSpec};
///
/// assert_eq!(build(&FilterSpec::default()), FilterNode::literal(true));
/// ```
pub fn build(filter: &FilterSpec) -> FilterNode {
    if filter.is_empty() {
        trace!("no predicates set");
        return FilterNode::literal(true);
    }

    let ctx = BuildContext::new(filter);
    if !ctx.consumed.is_empty() {
        trace!(consumed = ?ctx.consumed, "inputs claimed by composite definitions");
    }

    let mut nodes: Vec<FilterNode> = FIELD_DEFINITIONS
        .iter()
        .filter_map(|def| {
            let node = (def.build)(&ctx)?;
            debug!(
                definition = def.name,
                node = node.kind_name(),
                fields = ?def.touches,
                "filter definition applied"
            );
            Some(node)
        })
        .collect();

    match nodes.len() {
        0 => FilterNode::literal(true),
        1 => nodes.remove(0),
        _ => FilterNode::and(nodes),
    }
}

// ==================== Today Mode ====================

/// The due-before bound, when today mode is active.
fn today_due_before(filter: &FilterSpec) -> Option<&str> {
    if filter.today_mode == Some(true) {
        non_empty(filter.due_before.as_deref())
    } else {
        None
    }
}

fn claims_today(filter: &FilterSpec) -> &'static [&'static str] {
    if today_due_before(filter).is_some() {
        &[FLAGGED_KEY, DUE_BEFORE_KEY]
    } else {
        &[]
    }
}

fn build_today(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let before = today_due_before(ctx.filter)?;
    let (_, upper) = DateBias::parse(ctx.filter.due_date_operator.as_deref()).operators();

    Some(FilterNode::or(vec![
        FilterNode::and(vec![
            FilterNode::exists(TASK_DUE_DATE, true),
            FilterNode::comparison(TASK_DUE_DATE, upper, before),
        ]),
        FilterNode::comparison(TASK_FLAGGED, Operator::Eq, true),
    ]))
}

// ==================== Flags ====================

fn flag(field: &str, value: Option<bool>) -> Option<FilterNode> {
    value.map(|v| FilterNode::comparison(field, Operator::Eq, v))
}

fn build_completed(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_COMPLETED, ctx.filter.completed)
}

fn build_flagged(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    if ctx.is_consumed(FLAGGED_KEY) {
        return None;
    }
    flag(TASK_FLAGGED, ctx.filter.flagged)
}

fn build_blocked(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_BLOCKED, ctx.filter.blocked)
}

fn build_available(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_AVAILABLE, ctx.filter.available)
}

fn build_in_inbox(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_IN_INBOX, ctx.filter.in_inbox)
}

fn build_dropped(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_DROPPED, ctx.filter.dropped)
}

fn build_tag_status_valid(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    flag(TASK_TAG_STATUS_VALID, ctx.filter.tag_status_valid)
}

fn build_has_repetition_rule(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    ctx.filter
        .has_repetition_rule
        .map(|v| FilterNode::exists(TASK_REPETITION_RULE, v))
}

// ==================== References ====================

fn build_id(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let id = non_empty(ctx.filter.id.as_deref())?;
    Some(FilterNode::comparison(TASK_ID, Operator::Eq, id))
}

fn build_project(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let reference = ctx.filter.project_reference()?;
    Some(FilterNode::comparison(
        TASK_CONTAINING_PROJECT,
        Operator::Eq,
        reference,
    ))
}

// ==================== Tags and Text ====================

fn build_tags(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let tags = ctx.filter.tag_set()?.to_vec();
    let node = match ctx.filter.tags_operator.unwrap_or_default() {
        TagsOperator::All => FilterNode::comparison(TASK_TAGS, Operator::AllMatch, tags),
        TagsOperator::Any => FilterNode::comparison(TASK_TAGS, Operator::AnyMatch, tags),
        TagsOperator::None => {
            FilterNode::negate(FilterNode::comparison(TASK_TAGS, Operator::AnyMatch, tags))
        }
    };
    Some(node)
}

fn build_text(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let term = ctx.filter.search_term()?;
    let operator = match ctx.filter.text_operator.unwrap_or_default() {
        TextOperator::Contains => Operator::Contains,
        TextOperator::Regex => Operator::Matches,
    };

    Some(FilterNode::or(vec![
        FilterNode::comparison(TASK_NAME, operator, term),
        FilterNode::comparison(TASK_NOTE, operator, term),
    ]))
}

// ==================== Date Ranges ====================

/// Bias operator attached to a date range.
///
/// Bounds are inclusive by default. `>` makes only the lower bound strict and
/// `<` makes only the upper bound strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBias {
    #[default]
    Inclusive,
    StrictLower,
    StrictUpper,
}

impl DateBias {
    /// Parses a bias operator; anything unrecognized keeps both bounds inclusive.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(">") => DateBias::StrictLower,
            Some("<") => DateBias::StrictUpper,
            None | Some("" | ">=" | "<=") => DateBias::Inclusive,
            Some(other) => {
                warn!(operator = other, "ignoring date operator, using inclusive bounds");
                DateBias::Inclusive
            }
        }
    }

    /// Operators for the lower and upper bound, in that order.
    pub fn operators(self) -> (Operator, Operator) {
        match self {
            DateBias::Inclusive => (Operator::Ge, Operator::Le),
            DateBias::StrictLower => (Operator::Gt, Operator::Le),
            DateBias::StrictUpper => (Operator::Ge, Operator::Lt),
        }
    }
}

/// Lowers one date range to `And(Exists(field), [lower], [upper])`.
fn lower_date_range(
    field: &str,
    after: Option<&str>,
    before: Option<&str>,
    bias: Option<&str>,
) -> Option<FilterNode> {
    let after = non_empty(after);
    let before = non_empty(before);
    if after.is_none() && before.is_none() {
        return None;
    }

    let (lower, upper) = DateBias::parse(bias).operators();
    let mut children = vec![FilterNode::exists(field, true)];
    if let Some(after) = after {
        children.push(FilterNode::comparison(field, lower, after));
    }
    if let Some(before) = before {
        children.push(FilterNode::comparison(field, upper, before));
    }
    Some(FilterNode::and(children))
}

fn build_due(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    let before = if ctx.is_consumed(DUE_BEFORE_KEY) {
        None
    } else {
        ctx.filter.due_before.as_deref()
    };
    lower_date_range(
        TASK_DUE_DATE,
        ctx.filter.due_after.as_deref(),
        before,
        ctx.filter.due_date_operator.as_deref(),
    )
}

fn build_defer(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    lower_date_range(
        TASK_DEFER_DATE,
        ctx.filter.defer_after.as_deref(),
        ctx.filter.defer_before.as_deref(),
        ctx.filter.defer_date_operator.as_deref(),
    )
}

fn build_planned(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    lower_date_range(
        TASK_PLANNED_DATE,
        ctx.filter.planned_after.as_deref(),
        ctx.filter.planned_before.as_deref(),
        ctx.filter.planned_date_operator.as_deref(),
    )
}

fn build_completion(ctx: &BuildContext<'_>) -> Option<FilterNode> {
    lower_date_range(
        TASK_COMPLETION_DATE,
        ctx.filter.completion_after.as_deref(),
        ctx.filter.completion_before.as_deref(),
        ctx.filter.completion_date_operator.as_deref(),
    )
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
