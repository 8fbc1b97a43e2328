use std::fmt;

use rand::RngCore;
use rowsmith_core::ColumnRule;

use crate::charset::generate_id;

pub mod date_format;
pub mod primitives;

/// Fallback rendered by a text rule whose default is blank.
pub const TEXT_FALLBACK: &str = "Texte généré";

/// Marker rendered in place of a value when a rule cannot be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Range bounds are not numbers, or `min > max`.
    InvalidRange,
    /// Categorical source has no usable entries.
    NoCategories,
    /// Date bounds are not calendar dates, or `min_date > max_date`.
    InvalidDateRange,
}

impl Sentinel {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::InvalidRange => "INVALID_RANGE",
            Sentinel::NoCategories => "NO_CATEGORIES",
            Sentinel::InvalidDateRange => "INVALID_DATE_RANGE",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of generating one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(String),
    Sentinel(Sentinel),
}

impl Cell {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Cell::Sentinel(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Cell::Value(value) => value,
            Cell::Sentinel(sentinel) => sentinel.as_str().to_string(),
        }
    }
}

/// Generate one cell for a rule.
///
/// Never fails: malformed rule values produce a [`Cell::Sentinel`] and
/// unsupported rules produce an empty value.
pub fn generate_cell(rule: &ColumnRule, rng: &mut dyn RngCore) -> Cell {
    match rule {
        ColumnRule::Text { default_text } => primitives::text(default_text),
        ColumnRule::Range {
            min,
            max,
            decimal_places,
        } => primitives::numeric_range(min, max, decimal_places.unwrap_or(0), rng),
        ColumnRule::Categorical { values } => primitives::categorical(values, rng),
        ColumnRule::UniqueId { length, charset } => {
            Cell::Value(generate_id(*length, *charset, rng))
        }
        ColumnRule::Date {
            min_date, max_date, ..
        } => primitives::date_between(
            min_date,
            max_date,
            rule.date_format().unwrap_or(rowsmith_core::DEFAULT_DATE_FORMAT),
            rng,
        ),
        ColumnRule::Unsupported => Cell::Value(String::new()),
    }
}

/// Sentinel every cell of `rule` renders, if the rule cannot be honored.
///
/// Sentinels depend only on the rule, never on the RNG, so a rule either
/// always or never renders one.
pub fn rule_sentinel(rule: &ColumnRule) -> Option<Sentinel> {
    match rule {
        ColumnRule::Range {
            min,
            max,
            decimal_places,
        } => {
            let valid = match (min.parse(), max.parse()) {
                (Some(min), Some(max)) => {
                    min <= max && decimal_places.unwrap_or(0) <= primitives::MAX_DECIMAL_PLACES
                }
                _ => false,
            };
            (!valid).then_some(Sentinel::InvalidRange)
        }
        ColumnRule::Categorical { values } => values
            .categories()
            .is_empty()
            .then_some(Sentinel::NoCategories),
        ColumnRule::Date {
            min_date, max_date, ..
        } => {
            let valid = match (primitives::parse_date(min_date), primitives::parse_date(max_date)) {
                (Some(min), Some(max)) => min <= max,
                _ => false,
            };
            (!valid).then_some(Sentinel::InvalidDateRange)
        }
        ColumnRule::Text { .. } | ColumnRule::UniqueId { .. } | ColumnRule::Unsupported => None,
    }
}

/// Generate one value for a rule, rendering sentinels as their marker text.
pub fn generate_value(rule: &ColumnRule, rng: &mut dyn RngCore) -> String {
    generate_cell(rule, rng).into_string()
}
