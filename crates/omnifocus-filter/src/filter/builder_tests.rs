//! Tests for the filter builder.

use super::*;
use crate::filter::FilterValue;

fn spec(json: &str) -> FilterSpec {
    FilterSpec::from_json(json).unwrap()
}

fn and_children(node: &FilterNode) -> &[FilterNode] {
    match node {
        FilterNode::And { children } => children,
        other => panic!("expected And, got {other:?}"),
    }
}

// ==================== Combination Tests ====================

#[test]
fn test_build_empty_filter_is_literal_true() {
    assert_eq!(build(&FilterSpec::default()), FilterNode::literal(true));
}

#[test]
fn test_build_single_predicate_is_unwrapped() {
    let node = build(&spec(r#"{"flagged": true}"#));
    assert_eq!(
        node,
        FilterNode::comparison("task.flagged", Operator::Eq, true)
    );
}

#[test]
fn test_build_multiple_predicates_are_conjoined() {
    let node = build(&spec(r#"{"completed": false, "flagged": true}"#));
    assert_eq!(
        node,
        FilterNode::and(vec![
            FilterNode::comparison("task.completed", Operator::Eq, false),
            FilterNode::comparison("task.flagged", Operator::Eq, true),
        ])
    );
}

#[test]
fn test_build_follows_table_order_not_input_order() {
    let node = build(&spec(r#"{"dropped": false, "inInbox": true, "id": "abc"}"#));
    let fields: Vec<_> = and_children(&node)
        .iter()
        .map(|n| n.field().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["task.id", "task.inInbox", "task.dropped"]);
}

#[test]
fn test_build_status_flags() {
    let node = build(&spec(
        r#"{"blocked": false, "available": true, "tagStatusValid": true}"#,
    ));
    assert_eq!(
        and_children(&node),
        &[
            FilterNode::comparison("task.blocked", Operator::Eq, false),
            FilterNode::comparison("task.available", Operator::Eq, true),
            FilterNode::comparison("task.tagStatusValid", Operator::Eq, true),
        ]
    );
}

#[test]
fn test_build_repetition_rule_is_existence_check() {
    let node = build(&spec(r#"{"hasRepetitionRule": false}"#));
    assert_eq!(node, FilterNode::exists("task.repetitionRule", false));
}

#[test]
fn test_build_empty_strings_are_unset() {
    let node = build(&spec(r#"{"id": "", "text": "", "projectId": "", "tags": []}"#));
    assert_eq!(node, FilterNode::literal(true));
}

// ==================== Today Mode Tests ====================

#[test]
fn test_build_today_mode_is_single_or() {
    let node = build(&spec(r#"{"todayMode": true, "dueBefore": "2025-01-01"}"#));
    assert_eq!(
        node,
        FilterNode::or(vec![
            FilterNode::and(vec![
                FilterNode::exists("task.dueDate", true),
                FilterNode::comparison("task.dueDate", Operator::Le, "2025-01-01"),
            ]),
            FilterNode::comparison("task.flagged", Operator::Eq, true),
        ])
    );
}

#[test]
fn test_build_today_mode_suppresses_flagged() {
    let node = build(&spec(
        r#"{"todayMode": true, "dueBefore": "2025-01-01", "flagged": false}"#,
    ));
    assert!(matches!(node, FilterNode::Or { .. }));
}

#[test]
fn test_build_today_mode_keeps_due_after() {
    let node = build(&spec(
        r#"{"todayMode": true, "dueBefore": "2025-01-31", "dueAfter": "2025-01-01"}"#,
    ));
    let children = and_children(&node);
    assert_eq!(children.len(), 2);
    assert!(matches!(children[0], FilterNode::Or { .. }));
    assert_eq!(
        children[1],
        FilterNode::and(vec![
            FilterNode::exists("task.dueDate", true),
            FilterNode::comparison("task.dueDate", Operator::Ge, "2025-01-01"),
        ])
    );
}

#[test]
fn test_build_today_mode_without_due_before_is_inactive() {
    let node = build(&spec(r#"{"todayMode": true, "flagged": true}"#));
    assert_eq!(
        node,
        FilterNode::comparison("task.flagged", Operator::Eq, true)
    );
}

#[test]
fn test_build_today_mode_false_does_not_claim() {
    let node = build(&spec(
        r#"{"todayMode": false, "dueBefore": "2025-01-01", "flagged": true}"#,
    ));
    assert_eq!(and_children(&node).len(), 2);
}

#[test]
fn test_claims_are_collected_before_building() {
    let filter = spec(r#"{"todayMode": true, "dueBefore": "2025-01-01"}"#);
    let ctx = BuildContext::new(&filter);
    assert!(ctx.is_consumed("flagged"));
    assert!(ctx.is_consumed("dueBefore"));
    assert!(!ctx.is_consumed("dueAfter"));
}

#[test]
fn test_only_today_mode_claims_inputs() {
    let filter = spec(r#"{"todayMode": true, "dueBefore": "2025-01-01", "flagged": true}"#);
    let claiming: Vec<_> = FIELD_DEFINITIONS
        .iter()
        .filter(|def| !def.claims(&filter).is_empty())
        .map(|def| def.name)
        .collect();
    assert_eq!(claiming, vec!["todayMode"]);
}

#[test]
fn test_claims_are_declared_inputs() {
    let filter = spec(r#"{"todayMode": true, "dueBefore": "2025-01-01", "flagged": true}"#);
    for def in FIELD_DEFINITIONS {
        for key in def.claims(&filter) {
            assert!(def.inputs.contains(key), "{} claims undeclared input {key}", def.name);
        }
    }
}

fn collect_fields<'a>(node: &'a FilterNode, out: &mut Vec<&'a str>) {
    match node {
        FilterNode::And { children } | FilterNode::Or { children } => {
            children.iter().for_each(|child| collect_fields(child, out));
        }
        FilterNode::Not { child } => collect_fields(child, out),
        other => out.extend(other.field()),
    }
}

#[test]
fn test_definitions_only_touch_declared_fields() {
    let everything = r#"{
        "id": "abc", "completed": false, "flagged": true, "blocked": false,
        "available": true, "inInbox": false, "dropped": false,
        "tagStatusValid": true, "hasRepetitionRule": true, "projectId": "Work",
        "tags": ["home"], "text": "milk",
        "dueAfter": "2025-01-01", "dueBefore": "2025-02-01",
        "deferAfter": "2025-01-01", "deferBefore": "2025-02-01",
        "plannedAfter": "2025-01-01", "plannedBefore": "2025-02-01",
        "completionAfter": "2025-01-01", "completionBefore": "2025-02-01"
    }"#;
    let plain = spec(everything);
    let mut today = plain.clone();
    today.today_mode = Some(true);

    for filter in [&plain, &today] {
        let ctx = BuildContext::new(filter);
        for def in FIELD_DEFINITIONS {
            let Some(node) = (def.build)(&ctx) else {
                continue;
            };
            let mut fields = Vec::new();
            collect_fields(&node, &mut fields);
            assert!(!fields.is_empty(), "{} built a node without fields", def.name);
            for field in fields {
                assert!(def.touches.contains(&field), "{} touched {field}", def.name);
            }
        }
    }
}

// ==================== Date Range Tests ====================

#[test]
fn test_date_range_lower_bound_inclusive_by_default() {
    let node = build(&spec(r#"{"deferAfter": "2025-03-01"}"#));
    assert_eq!(
        node,
        FilterNode::and(vec![
            FilterNode::exists("task.deferDate", true),
            FilterNode::comparison("task.deferDate", Operator::Ge, "2025-03-01"),
        ])
    );
}

#[test]
fn test_date_range_both_bounds() {
    let node = build(&spec(
        r#"{"plannedAfter": "2025-03-01", "plannedBefore": "2025-03-31"}"#,
    ));
    assert_eq!(
        node,
        FilterNode::and(vec![
            FilterNode::exists("task.plannedDate", true),
            FilterNode::comparison("task.plannedDate", Operator::Ge, "2025-03-01"),
            FilterNode::comparison("task.plannedDate", Operator::Le, "2025-03-31"),
        ])
    );
}

#[test]
fn test_date_range_strict_lower_bias_flips_only_lower() {
    let node = build(&spec(
        r#"{"dueAfter": "2025-03-01", "dueBefore": "2025-03-31", "dueDateOperator": ">"}"#,
    ));
    let children = and_children(&node);
    assert_eq!(
        children[1],
        FilterNode::comparison("task.dueDate", Operator::Gt, "2025-03-01")
    );
    assert_eq!(
        children[2],
        FilterNode::comparison("task.dueDate", Operator::Le, "2025-03-31")
    );
}

#[test]
fn test_date_range_strict_upper_bias_flips_only_upper() {
    let node = build(&spec(
        r#"{"completionAfter": "2025-03-01", "completionBefore": "2025-03-31", "completionDateOperator": "<"}"#,
    ));
    let children = and_children(&node);
    assert_eq!(
        children[1],
        FilterNode::comparison("task.completionDate", Operator::Ge, "2025-03-01")
    );
    assert_eq!(
        children[2],
        FilterNode::comparison("task.completionDate", Operator::Lt, "2025-03-31")
    );
}

#[test]
fn test_date_range_unknown_bias_is_ignored() {
    assert_eq!(DateBias::parse(Some("between")), DateBias::Inclusive);
    assert_eq!(DateBias::parse(Some(" > ")), DateBias::StrictLower);
    assert_eq!(DateBias::parse(None).operators(), (Operator::Ge, Operator::Le));
}

#[test]
fn test_date_ranges_are_independent() {
    let node = build(&spec(
        r#"{"dueBefore": "2025-01-01", "deferAfter": "2024-12-01", "dueDateOperator": "<"}"#,
    ));
    let children = and_children(&node);
    assert_eq!(
        and_children(&children[0])[1],
        FilterNode::comparison("task.dueDate", Operator::Lt, "2025-01-01")
    );
    assert_eq!(
        and_children(&children[1])[1],
        FilterNode::comparison("task.deferDate", Operator::Ge, "2024-12-01")
    );
}

// ==================== Tag Tests ====================

#[test]
fn test_tags_default_to_any() {
    let node = build(&spec(r#"{"tags": ["home"]}"#));
    assert_eq!(
        node,
        FilterNode::comparison("taskTags", Operator::AnyMatch, vec!["home"])
    );
}

#[test]
fn test_tags_all() {
    let node = build(&spec(r#"{"tags": ["a", "b"], "tagsOperator": "AND"}"#));
    assert_eq!(
        node,
        FilterNode::comparison("taskTags", Operator::AllMatch, vec!["a", "b"])
    );
}

#[test]
fn test_tags_none_with_id() {
    let node = build(&spec(
        r#"{"id": "x", "tags": ["a", "b"], "tagsOperator": "NOT_IN"}"#,
    ));
    assert_eq!(
        node,
        FilterNode::and(vec![
            FilterNode::comparison("task.id", Operator::Eq, "x"),
            FilterNode::negate(FilterNode::comparison(
                "taskTags",
                Operator::AnyMatch,
                vec!["a", "b"]
            )),
        ])
    );
}

// ==================== Text and Reference Tests ====================

#[test]
fn test_text_contains_checks_name_and_note() {
    let node = build(&spec(r#"{"text": "milk"}"#));
    assert_eq!(
        node,
        FilterNode::or(vec![
            FilterNode::comparison("task.name", Operator::Contains, "milk"),
            FilterNode::comparison("task.note", Operator::Contains, "milk"),
        ])
    );
}

#[test]
fn test_text_regex_mode() {
    let node = build(&spec(r#"{"text": "^call", "textOperator": "MATCHES"}"#));
    let FilterNode::Or { children } = node else {
        panic!("expected Or");
    };
    assert!(children
        .iter()
        .all(|c| matches!(c, FilterNode::Comparison { operator: Operator::Matches, .. })));
}

#[test]
fn test_legacy_search_alias() {
    assert_eq!(
        build(&spec(r#"{"search": "milk"}"#)),
        build(&spec(r#"{"text": "milk"}"#))
    );
}

#[test]
fn test_legacy_project_alias() {
    let node = build(&spec(r#"{"project": "Errands"}"#));
    assert_eq!(
        node,
        FilterNode::comparison(
            "task.containingProject",
            Operator::Eq,
            FilterValue::from("Errands")
        )
    );
    assert_eq!(node, build(&spec(r#"{"projectId": "Errands"}"#)));
}

#[test]
fn test_project_id_wins_over_legacy_project() {
    let node = build(&spec(r#"{"projectId": "abc123def45", "project": "Errands"}"#));
    assert_eq!(
        node,
        FilterNode::comparison("task.containingProject", Operator::Eq, "abc123def45")
    );
}
