use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Date pattern used when a date rule leaves `format` unset.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Identifier length used when a unique-id rule leaves `length` unset.
pub const DEFAULT_ID_LENGTH: i64 = 10;

fn default_id_length() -> i64 {
    DEFAULT_ID_LENGTH
}

/// Generation rule for a single column.
///
/// The `type` tag selects one payload shape per kind. Rule values are kept as
/// the user entered them; they are parsed (and rejected with a sentinel) only
/// when a value is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnRule {
    /// Constant text, with a fixed fallback when left blank.
    Text {
        #[serde(default)]
        default_text: String,
    },
    /// Uniform number in `[min, max]` rendered with fixed decimals.
    #[serde(alias = "numeric_range")]
    Range {
        min: NumericInput,
        max: NumericInput,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimal_places: Option<u32>,
    },
    /// One entry picked from a list of categories.
    Categorical { values: CategorySource },
    /// Random string drawn from a named alphabet.
    #[serde(alias = "uniqueId")]
    UniqueId {
        #[serde(default = "default_id_length")]
        length: i64,
        #[serde(default)]
        charset: Charset,
    },
    /// Calendar date between two bounds, both inclusive.
    Date {
        min_date: String,
        max_date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// Any tag this version does not know; renders empty cells.
    #[serde(other)]
    Unsupported,
}

impl Default for ColumnRule {
    fn default() -> Self {
        ColumnRule::Text {
            default_text: String::new(),
        }
    }
}

impl ColumnRule {
    /// Stable name of the rule kind, as used in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnRule::Text { .. } => "text",
            ColumnRule::Range { .. } => "range",
            ColumnRule::Categorical { .. } => "categorical",
            ColumnRule::UniqueId { .. } => "unique_id",
            ColumnRule::Date { .. } => "date",
            ColumnRule::Unsupported => "unsupported",
        }
    }

    /// Date pattern for a date rule, falling back to [`DEFAULT_DATE_FORMAT`].
    pub fn date_format(&self) -> Option<&str> {
        match self {
            ColumnRule::Date { format, .. } => Some(
                format
                    .as_deref()
                    .filter(|value| !value.is_empty())
                    .unwrap_or(DEFAULT_DATE_FORMAT),
            ),
            _ => None,
        }
    }
}

/// Alphabet selector for unique identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// Decimal digits only.
    Numbers,
    /// Latin letters (both cases) and digits.
    #[default]
    Alphanumeric,
    /// Alphanumerics plus punctuation and symbols.
    All,
}

/// Raw numeric bound as entered by the user: a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Parse the bound into a finite float, if possible.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(value) => *value,
            NumericInput::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Source of categorical values: comma-separated text or an explicit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CategorySource {
    List(Vec<String>),
    Csv(String),
}

impl CategorySource {
    /// Trimmed, non-empty categories in source order.
    pub fn categories(&self) -> Vec<&str> {
        match self {
            CategorySource::List(values) => values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .collect(),
            CategorySource::Csv(source) => source
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .collect(),
        }
    }
}

impl From<&str> for CategorySource {
    fn from(value: &str) -> Self {
        CategorySource::Csv(value.to_string())
    }
}
