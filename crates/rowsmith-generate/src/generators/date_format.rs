//! Token-based date rendering (`YYYY-MM-DD`, `DD/MM/YY`, `[on] dddd`, ...).
//!
//! Tokens follow the day.js conventions; text inside `[...]` is emitted
//! verbatim and unknown characters pass through unchanged. Dates render at
//! midnight UTC, so time tokens produce zero values.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::{Captures, Regex};

const TOKEN_PATTERN: &str =
    r"\[([^\]]+)]|Y{1,4}|M{1,4}|D{1,2}|d{1,4}|H{1,2}|h{1,2}|a|A|m{1,2}|s{1,2}|Z{1,2}|SSS";

fn token_regex() -> Option<&'static Regex> {
    static TOKENS: OnceLock<Option<Regex>> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(TOKEN_PATTERN).ok()).as_ref()
}

/// Render `date` using a token pattern.
pub fn render_date(date: NaiveDate, pattern: &str) -> String {
    let Some(tokens) = token_regex() else {
        return pattern.to_string();
    };
    let moment = NaiveDateTime::new(date, NaiveTime::default());
    tokens
        .replace_all(pattern, |caps: &Captures<'_>| {
            if let Some(literal) = caps.get(1) {
                return literal.as_str().to_string();
            }
            render_token(&moment, &caps[0])
        })
        .into_owned()
}

fn render_token(moment: &NaiveDateTime, token: &str) -> String {
    match token {
        "YY" => format!("{:02}", moment.year().rem_euclid(100)),
        "YYYY" => format!("{:04}", moment.year()),
        "M" => moment.month().to_string(),
        "MM" => format!("{:02}", moment.month()),
        "MMM" => moment.format("%b").to_string(),
        "MMMM" => moment.format("%B").to_string(),
        "D" => moment.day().to_string(),
        "DD" => format!("{:02}", moment.day()),
        "d" => moment.weekday().num_days_from_sunday().to_string(),
        "dd" => moment.format("%a").to_string().chars().take(2).collect(),
        "ddd" => moment.format("%a").to_string(),
        "dddd" => moment.format("%A").to_string(),
        "H" => moment.hour().to_string(),
        "HH" => format!("{:02}", moment.hour()),
        "h" => moment.hour12().1.to_string(),
        "hh" => format!("{:02}", moment.hour12().1),
        "a" => meridiem(moment).to_lowercase(),
        "A" => meridiem(moment).to_string(),
        "m" => moment.minute().to_string(),
        "mm" => format!("{:02}", moment.minute()),
        "s" => moment.second().to_string(),
        "ss" => format!("{:02}", moment.second()),
        "SSS" => format!("{:03}", moment.nanosecond() / 1_000_000),
        "Z" => "+00:00".to_string(),
        "ZZ" => "+0000".to_string(),
        // Partial runs such as `Y` or `YYY` are printed verbatim rather than
        // through a zone-offset fallback.
        other => other.to_string(),
    }
}

fn meridiem(moment: &NaiveDateTime) -> &'static str {
    if moment.hour12().0 { "PM" } else { "AM" }
}
