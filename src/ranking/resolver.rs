//! Column value lookup and display formatting.
//!
//! An entry keeps its fields in three places. A column value is looked up in
//! this order, and the first location that has the key wins:
//!
//! 1. the entry's top-level fields
//! 2. the `data` bag
//! 3. the `metadata` bag
//!
//! A key holding JSON `null` counts as present. A column found nowhere has no
//! value and is rendered as [`PLACEHOLDER`].

use crate::models::entry::{Entry, RankedEntry, RANK_FIELD};
use crate::models::leaderboard::{Column, ColumnType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const PLACEHOLDER: &str = "-";

pub fn resolve_value<'a>(entry: &'a Entry, column: &str) -> Option<&'a Value> {
    entry
        .fields
        .get(column)
        .or_else(|| entry.data.as_ref().and_then(|data| data.get(column)))
        .or_else(|| entry.metadata.as_ref().and_then(|meta| meta.get(column)))
}

/// Like [`resolve_value`], but the reserved `rank` column yields the
/// computed rank, which takes precedence over anything stored.
pub fn resolve_ranked(entry: &RankedEntry, column: &str) -> Option<Value> {
    if column == RANK_FIELD {
        return Some(Value::from(entry.rank));
    }
    resolve_value(&entry.entry, column).cloned()
}

pub fn format_value(value: Option<&Value>, kind: ColumnType) -> String {
    let value = match value {
        None | Some(Value::Null) => return PLACEHOLDER.to_string(),
        Some(v) => v,
    };

    match kind {
        ColumnType::Number => match value.as_f64() {
            Some(n) => group_thousands(n),
            None => display_string(value),
        },
        ColumnType::Date => match value.as_str() {
            Some(s) => match parse_date(s) {
                Some(date) => date.format("%-m/%-d/%Y").to_string(),
                None => s.to_string(),
            },
            None => display_string(value),
        },
        ColumnType::Boolean => {
            if is_truthy(value) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        ColumnType::Text | ColumnType::Image | ColumnType::Custom => display_string(value),
    }
}

pub fn column_display_name(column: &Column) -> String {
    match column.display_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            let mut chars = column.name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Plain string form of a JSON value: strings unquoted, everything else in
/// its JSON representation.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts RFC 3339 timestamps, bare `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date())
}

/// Same formats as [`parse_date`], keeping the time of day. Offsets are
/// normalized to UTC and a bare date maps to midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !has_date_prefix(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// chrono accepts unpadded fields, so `3-1-2` would otherwise read as a date.
fn has_date_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `1234567.891` -> `1,234,567.891`, at most three fraction digits.
fn group_thousands(n: f64) -> String {
    let rounded = format!("{:.3}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = n < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
