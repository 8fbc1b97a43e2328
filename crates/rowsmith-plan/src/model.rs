use std::path::{Path, PathBuf};

use rowsmith_core::ColumnDefinition;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PlanError, Result};

/// Plan contract version written by this release.
pub const PLAN_VERSION: &str = "0.1";

/// Augmentation plan.
///
/// `columns` assigns rules to template columns by name; template columns
/// without a rule fall back to the default text rule. `new_columns` are
/// appended after the template columns in the order given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Plan contract version.
    pub plan_version: String,
    /// Seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Number of records to generate.
    pub rows: i64,
    /// CSV template whose header supplies the existing columns; relative
    /// paths resolve against the plan file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Rules for template columns, keyed by column name.
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Columns added on top of the template.
    #[serde(default)]
    pub new_columns: Vec<ColumnDefinition>,
}

impl Plan {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Load and parse a `.json` or `.toml` plan file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_value(load_plan_value(path)?)
    }

    /// Template path resolved against the directory holding `plan_path`.
    pub fn template_path(&self, plan_path: &Path) -> Option<PathBuf> {
        let template = self.template.as_ref()?;
        if template.is_absolute() {
            return Some(template.clone());
        }
        let base = plan_path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(template))
    }
}

/// Read a plan file into a JSON document, picking the parser by extension.
///
/// TOML plans are converted to the same JSON shape so both formats go
/// through one structural validation.
pub fn load_plan_value(path: &Path) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let contents = std::fs::read_to_string(path)?;
    match extension.as_str() {
        "json" => Ok(serde_json::from_str(&contents)?),
        "toml" => parse_toml_plan(&contents),
        _ => Err(PlanError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Parse a TOML plan into JSON. Bare TOML dates and times become strings so
/// `min_date = 2024-01-01` reads the same as the quoted form.
fn parse_toml_plan(contents: &str) -> Result<Value> {
    let value: toml::Value = toml::from_str(contents)?;
    Ok(toml_to_json(value))
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => {
            serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number)
        }
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
