use std::path::{Path, PathBuf};

use rowsmith_core::{ColumnOrigin, ColumnRule};
use rowsmith_plan::{
    Plan, load_plan_value, plan_json_schema, resolve_schema, validate_plan,
    validate_plan_against_template, validate_plan_json,
};
use serde_json::{Value, json};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../plans/examples")
        .join(name)
}

fn plan_schema() -> Value {
    serde_json::to_value(plan_json_schema()).expect("serialize plan schema")
}

fn template() -> Vec<String> {
    ["id", "name", "age", "signup_date"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn codes(issues: &[rowsmith_plan::ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|issue| issue.code.as_str()).collect()
}

#[test]
fn basic_plan_validates_against_schema() {
    let plan_json = load_plan_value(&fixture("basic.plan.json")).expect("load plan");
    let plan_schema = plan_schema();

    let structural = validate_plan_json(&plan_json, &plan_schema).expect("validate plan json schema");
    assert!(structural.errors.is_empty(), "structural errors: {:?}", structural.errors);

    let validated =
        validate_plan(&plan_json, &plan_schema, &template()).expect("plan validation should succeed");
    assert!(validated.warnings.is_empty(), "unexpected warnings: {:?}", validated.warnings);
    assert_eq!(validated.schema.len(), 7);
    assert_eq!(
        validated.schema.header(),
        ["id", "name", "age", "signup_date", "segment", "score", "note"]
    );
}

#[test]
fn toml_fixture_matches_json_fixture() {
    let json_plan = Plan::load(&fixture("basic.plan.json")).expect("json plan");
    let toml_plan = Plan::load(&fixture("basic.plan.toml")).expect("toml plan");
    assert_eq!(json_plan, toml_plan);
}

#[test]
fn new_columns_only_plan_needs_no_template() {
    let plan_json = load_plan_value(&fixture("new_columns_only.plan.json")).expect("load plan");
    let validated = validate_plan(&plan_json, &plan_schema(), &[]).expect("valid plan");
    assert!(validated.schema.existing_columns.is_empty());
    assert_eq!(validated.schema.new_columns.len(), 3);
}

#[test]
fn structural_errors_carry_json_pointers() {
    let plan_json = json!({
        "plan_version": "0.1",
        "rows": "many",
        "new_columns": [{ "name": "a" }]
    });
    let report = validate_plan_json(&plan_json, &plan_schema()).expect("compile schema");
    assert!(!report.is_ok());
    let paths: Vec<&str> = report.errors.iter().map(|issue| issue.path.as_str()).collect();
    assert!(paths.contains(&"/rows"), "{paths:?}");
    assert!(paths.iter().any(|path| path.starts_with("/new_columns/0")), "{paths:?}");
}

#[test]
fn legacy_and_unknown_rule_tags_pass_structural_validation() {
    let plan_json = json!({
        "plan_version": "0.1",
        "rows": 2,
        "new_columns": [
            { "name": "n", "rule": { "type": "numeric_range", "min": 1, "max": 2 } },
            { "name": "u", "rule": { "type": "uniqueId", "length": 4 } },
            { "name": "x", "rule": { "type": "lorem_ipsum" } }
        ]
    });
    let validated = validate_plan(&plan_json, &plan_schema(), &[]).expect("valid plan");
    assert_eq!(codes(&validated.warnings), ["unsupported_rule"]);
    assert_eq!(validated.warnings[0].path, "/new_columns/2/rule");
}

#[test]
fn template_checks_collect_every_issue() {
    let plan = Plan::from_value(json!({
        "plan_version": "0.1",
        "rows": 0,
        "columns": [
            { "name": "id", "rule": { "type": "text", "default_text": "x" } },
            { "name": "id", "rule": { "type": "text" } },
            { "name": "missing", "rule": { "type": "text" } }
        ],
        "new_columns": [
            { "name": "  ", "rule": { "type": "text" } },
            { "name": " age ", "rule": { "type": "text" } },
            { "name": "extra", "rule": { "type": "text" } },
            { "name": "extra", "rule": { "type": "text" } }
        ]
    }))
    .expect("parse plan");

    let report = validate_plan_against_template(&plan, &template());
    assert_eq!(
        codes(&report.errors),
        [
            "invalid_row_count",
            "duplicate_rule",
            "unknown_column",
            "empty_column_name",
            "duplicate_column_name",
            "duplicate_column_name",
        ]
    );
    assert_eq!(report.with_code("default_rule").count(), 3);
}

#[test]
fn sentinel_rules_are_reported_as_warnings() {
    let plan = Plan::from_value(json!({
        "plan_version": "0.1",
        "rows": 1,
        "new_columns": [
            { "name": "r", "rule": { "type": "range", "min": "10", "max": "1" } },
            { "name": "c", "rule": { "type": "categorical", "values": " , " } },
            { "name": "d", "rule": { "type": "date", "min_date": "", "max_date": "2024-01-01" } },
            { "name": "u", "rule": { "type": "unique_id", "length": 0 } }
        ]
    }))
    .expect("parse plan");

    let report = validate_plan_against_template(&plan, &[]);
    assert!(report.is_ok());
    assert_eq!(
        codes(&report.warnings),
        ["sentinel_range", "empty_categories", "sentinel_date", "empty_unique_id"]
    );
    assert_eq!(
        report.warnings[0].hint.as_deref(),
        Some("every cell will read INVALID_RANGE")
    );
}

#[test]
fn nothing_to_generate_is_an_error() {
    let plan = Plan::from_value(json!({ "plan_version": "0.1", "rows": 3 })).expect("parse plan");
    let report = validate_plan_against_template(&plan, &[]);
    assert_eq!(codes(&report.errors), ["nothing_to_generate"]);
}

#[test]
fn resolve_schema_applies_rules_and_defaults() {
    let plan = Plan::from_value(json!({
        "plan_version": "0.1",
        "rows": 1,
        "columns": [{ "name": "age", "rule": { "type": "range", "min": 1, "max": 2 } }],
        "new_columns": [{ "name": "flag", "rule": { "type": "text", "default_text": "y" } }]
    }))
    .expect("parse plan");

    let schema = resolve_schema(&plan, &template());
    let columns: Vec<_> = schema.columns().collect();
    assert_eq!(columns.len(), 5);
    assert_eq!(columns[0].1.rule, ColumnRule::default());
    assert_eq!(columns[2].1.rule.kind(), "range");
    assert_eq!(columns[4].0, ColumnOrigin::New);
    assert_eq!(columns[4].1.name, "flag");
}
