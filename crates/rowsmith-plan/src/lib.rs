//! Augmentation plans: the configuration that selects a template, assigns
//! rules to its columns, and declares the new columns to add.

pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use model::{PLAN_VERSION, Plan, load_plan_value};
pub use schema::plan_json_schema;
pub use validate::{
    ValidatedPlan, resolve_schema, validate_plan, validate_plan_against_template,
    validate_plan_json,
};
