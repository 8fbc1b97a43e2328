use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rule::ColumnRule;

/// A named column together with the rule that fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDefinition {
    pub name: String,
    pub rule: ColumnRule,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, rule: ColumnRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Name with surrounding whitespace removed, as used for output keys.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

/// Where a column in the combined schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrigin {
    /// Column read from the input template; its name is fixed.
    Existing,
    /// Column added by the user; its name must be validated.
    New,
}

/// Snapshot of every column used by one generation request.
///
/// Existing columns keep template order and come first; new columns follow
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub existing_columns: Vec<ColumnDefinition>,
    pub new_columns: Vec<ColumnDefinition>,
}

impl Schema {
    pub fn new(existing_columns: Vec<ColumnDefinition>, new_columns: Vec<ColumnDefinition>) -> Self {
        Self {
            existing_columns,
            new_columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.existing_columns.is_empty() && self.new_columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.existing_columns.len() + self.new_columns.len()
    }

    /// Combined column sequence with origin tags.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnOrigin, &ColumnDefinition)> {
        self.existing_columns
            .iter()
            .map(|col| (ColumnOrigin::Existing, col))
            .chain(self.new_columns.iter().map(|col| (ColumnOrigin::New, col)))
    }

    /// Output header: existing names verbatim, new names trimmed.
    pub fn header(&self) -> Vec<String> {
        self.columns()
            .map(|(origin, col)| match origin {
                ColumnOrigin::Existing => col.name.clone(),
                ColumnOrigin::New => col.trimmed_name().to_string(),
            })
            .collect()
    }
}
