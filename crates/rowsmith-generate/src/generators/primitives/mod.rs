use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use rand::{Rng, RngCore};
use rowsmith_core::{CategorySource, NumericInput};

use crate::generators::date_format::render_date;
use crate::generators::{Cell, Sentinel, TEXT_FALLBACK};

/// Largest precision accepted for fixed-point rendering.
pub const MAX_DECIMAL_PLACES: u32 = 100;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn text(default_text: &str) -> Cell {
    if default_text.is_empty() {
        Cell::Value(TEXT_FALLBACK.to_string())
    } else {
        Cell::Value(default_text.to_string())
    }
}

pub fn numeric_range(
    min: &NumericInput,
    max: &NumericInput,
    decimal_places: u32,
    rng: &mut dyn RngCore,
) -> Cell {
    let (Some(min), Some(max)) = (min.parse(), max.parse()) else {
        return Cell::Sentinel(Sentinel::InvalidRange);
    };
    if min > max || decimal_places > MAX_DECIMAL_PLACES {
        return Cell::Sentinel(Sentinel::InvalidRange);
    }
    Cell::Value(format_fixed(sample_between(min, max, rng), min, max, decimal_places as usize))
}

/// Uniform draw in `[min, max]` that stays finite even when `max - min`
/// overflows.
fn sample_between(min: f64, max: f64, rng: &mut dyn RngCore) -> f64 {
    let u: f64 = rng.random_range(0.0..=1.0);
    (min * (1.0 - u) + max * u).clamp(min, max)
}

/// Render `value` with exactly `places` fractional digits.
///
/// Rounding follows `format!` (nearest, ties to even on the exact binary
/// value). A rounded value that escapes `[min, max]` is pulled back to the
/// nearest representable bound when one exists at this precision.
pub fn format_fixed(value: f64, min: f64, max: f64, places: usize) -> String {
    let mut text = format!("{value:.places$}");
    let rounded = text.parse::<f64>().unwrap_or(value);
    let factor = 10_f64.powi(places as i32);

    if rounded < min {
        let up = (min * factor).ceil() / factor;
        if up.is_finite() && up <= max {
            text = format!("{up:.places$}");
        }
    } else if rounded > max {
        let down = (max * factor).floor() / factor;
        if down.is_finite() && down >= min {
            text = format!("{down:.places$}");
        }
    }

    if text.starts_with('-') && text.parse::<f64>().is_ok_and(|parsed| parsed == 0.0) {
        text.remove(0);
    }
    text
}

pub fn categorical(values: &CategorySource, rng: &mut dyn RngCore) -> Cell {
    let categories = values.categories();
    if categories.is_empty() {
        return Cell::Sentinel(Sentinel::NoCategories);
    }
    let idx = rng.random_range(0..categories.len());
    Cell::Value(categories[idx].to_string())
}

pub fn date_between(min_date: &str, max_date: &str, format: &str, rng: &mut dyn RngCore) -> Cell {
    let (Some(min), Some(max)) = (parse_date(min_date), parse_date(max_date)) else {
        return Cell::Sentinel(Sentinel::InvalidDateRange);
    };
    if min > max {
        return Cell::Sentinel(Sentinel::InvalidDateRange);
    }
    let span = (max - min).num_days();
    let offset = rng.random_range(0..=span);
    match min.checked_add_days(Days::new(offset.unsigned_abs())) {
        Some(date) => Cell::Value(render_date(date, format)),
        None => Cell::Sentinel(Sentinel::InvalidDateRange),
    }
}

/// Parse a calendar date, keeping only the date part of date-times.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| parse_compact_date(value))
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|dt| dt.date())
        })
}

/// `YYYYMMDD`, split by position.
fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let year = value[..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
