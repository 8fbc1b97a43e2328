use std::collections::{BTreeSet, HashMap};

use jsonschema::JSONSchema;
use rowsmith_core::{ColumnDefinition, ColumnRule, Schema};
use rowsmith_generate::{Sentinel, rule_sentinel};
use serde_json::Value;

use crate::errors::{IssueSeverity, PlanError, ValidationIssue, ValidationReport};
use crate::model::{PLAN_VERSION, Plan};

/// Validated plan with its resolved schema and accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: Plan,
    pub schema: Schema,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a plan JSON document against the plan JSON Schema.
pub fn validate_plan_json(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidationReport, PlanError> {
    let compiled =
        JSONSchema::compile(plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(plan_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Check a parsed plan against the template's column names.
///
/// Unlike the generator's own naming check, every issue is collected.
pub fn validate_plan_against_template(plan: &Plan, template_columns: &[String]) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_version(plan, &mut report);
    validate_request(plan, template_columns, &mut report);
    validate_template_rules(plan, template_columns, &mut report);
    validate_new_columns(plan, template_columns, &mut report);

    for (idx, column) in plan.columns.iter().enumerate() {
        lint_rule(&column.rule, &format!("/columns/{idx}/rule"), &mut report);
    }
    for (idx, column) in plan.new_columns.iter().enumerate() {
        lint_rule(&column.rule, &format!("/new_columns/{idx}/rule"), &mut report);
    }

    report
}

/// Validate the plan end-to-end, returning structured issues on failure.
pub fn validate_plan(
    plan_json: &Value,
    plan_schema: &Value,
    template_columns: &[String],
) -> Result<ValidatedPlan, ValidationReport> {
    let structural = match validate_plan_json(plan_json, plan_schema) {
        Ok(report) => report,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_validation_error",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: Plan = match serde_json::from_value(plan_json.clone()) {
        Ok(plan) => plan,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "invalid_plan_json",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    let template_report = validate_plan_against_template(&plan, template_columns);
    if !template_report.is_ok() {
        return Err(template_report);
    }

    let schema = resolve_schema(&plan, template_columns);
    Ok(ValidatedPlan {
        plan,
        schema,
        warnings: template_report.warnings,
    })
}

/// Combine template columns and plan rules into a generation schema.
///
/// Template columns keep header order and take the first plan rule naming
/// them, or the default text rule. New columns follow in plan order.
pub fn resolve_schema(plan: &Plan, template_columns: &[String]) -> Schema {
    let mut rules: HashMap<&str, &ColumnRule> = HashMap::new();
    for column in &plan.columns {
        rules.entry(column.name.as_str()).or_insert(&column.rule);
    }

    let existing = template_columns
        .iter()
        .map(|name| {
            let rule = rules.get(name.as_str()).map(|rule| (*rule).clone());
            ColumnDefinition::new(name.clone(), rule.unwrap_or_default())
        })
        .collect();

    Schema::new(existing, plan.new_columns.clone())
}

fn validate_version(plan: &Plan, report: &mut ValidationReport) {
    if plan.plan_version != PLAN_VERSION {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "plan_version_mismatch",
            "/plan_version",
            format!(
                "plan_version '{}' differs from supported version '{PLAN_VERSION}'",
                plan.plan_version
            ),
            Some(format!("set plan_version to \"{PLAN_VERSION}\"")),
        ));
    }
}

fn validate_request(plan: &Plan, template_columns: &[String], report: &mut ValidationReport) {
    if template_columns.is_empty() && plan.new_columns.is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "nothing_to_generate",
            "/",
            "no template columns and no new columns",
            Some("provide a template or add at least one entry to new_columns".to_string()),
        ));
    }

    if plan.rows <= 0 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "invalid_row_count",
            "/rows",
            format!("rows must be a positive integer, got {}", plan.rows),
            None,
        ));
    }
}

fn validate_template_rules(plan: &Plan, template_columns: &[String], report: &mut ValidationReport) {
    let known: BTreeSet<&str> = template_columns.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();

    for (idx, column) in plan.columns.iter().enumerate() {
        let path = format!("/columns/{idx}/name");
        if !known.contains(column.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_column",
                path,
                format!("column '{}' is not in the template", column.name),
                Some("rules in columns must name a template header; use new_columns to add columns".to_string()),
            ));
        } else if !seen.insert(column.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_rule",
                path,
                format!("column '{}' already has a rule", column.name),
                None,
            ));
        }
    }

    for name in template_columns {
        if !seen.contains(name.as_str()) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "default_rule",
                "/columns",
                format!("template column '{name}' has no rule; it will use the default text rule"),
                None,
            ));
        }
    }
}

fn validate_new_columns(plan: &Plan, template_columns: &[String], report: &mut ValidationReport) {
    let mut taken: BTreeSet<&str> = template_columns.iter().map(String::as_str).collect();

    for (idx, column) in plan.new_columns.iter().enumerate() {
        let path = format!("/new_columns/{idx}/name");
        let name = column.trimmed_name();
        if name.is_empty() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "empty_column_name",
                path,
                "new column name must not be empty",
                None,
            ));
        } else if !taken.insert(name) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_column_name",
                path,
                format!("column name '{name}' is already used"),
                Some("names are compared after trimming surrounding whitespace".to_string()),
            ));
        }
    }
}

fn lint_rule(rule: &ColumnRule, path: &str, report: &mut ValidationReport) {
    let issue = match rule_sentinel(rule) {
        Some(Sentinel::InvalidRange) => Some((
            "sentinel_range",
            "range bounds are not numbers, min exceeds max, or decimal_places is too large",
        )),
        Some(Sentinel::NoCategories) => {
            Some(("empty_categories", "categorical rule has no values"))
        }
        Some(Sentinel::InvalidDateRange) => Some((
            "sentinel_date",
            "date bounds are not calendar dates or min_date is after max_date",
        )),
        None => match rule {
            ColumnRule::UniqueId { length, .. } if *length <= 0 => Some((
                "empty_unique_id",
                "unique_id length is not positive; cells will be empty",
            )),
            ColumnRule::Unsupported => {
                Some(("unsupported_rule", "unknown rule type; cells will be empty"))
            }
            _ => None,
        },
    };

    if let Some((code, message)) = issue {
        let hint = rule_sentinel(rule).map(|sentinel| format!("every cell will read {sentinel}"));
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            code,
            path,
            message,
            hint,
        ));
    }
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
