use super::resolver::{display_string, parse_datetime, resolve_value};
use crate::models::entry::{Entry, RankedEntry, RANK_FIELD};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::cmp::Ordering;

/// Orders entries by `sort_column` and stamps each with a 1-based rank.
///
/// Numbers sort high to low, dates newest first, other values as text in
/// ascending order. Entries without a value go last. Ties keep their input
/// order. An empty `sort_column` leaves the order untouched and ranks by
/// position.
///
/// Any stored `rank` field is dropped; rank only exists on the result.
pub fn rank_entries(entries: Vec<Entry>, sort_column: &str) -> Vec<RankedEntry> {
    let mut entries: Vec<Entry> = entries
        .into_iter()
        .map(|mut entry| {
            entry.fields.remove(RANK_FIELD);
            entry
        })
        .collect();

    if !sort_column.is_empty() && entries.len() > 1 {
        // Stable, so equal keys keep their relative order.
        entries.sort_by_cached_key(|entry| SortKey::of(resolve_value(entry, sort_column)));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedEntry {
            rank: index as u32 + 1,
            entry,
        })
        .collect()
}

/// Rank suffix for labels such as `1st`, `12th`, `23rd`.
pub fn rank_suffix(rank: u32) -> &'static str {
    if (11..=13).contains(&(rank % 100)) {
        return "th";
    }
    match rank % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Compact score: `1.2M`, `12.5K`, or the plain number below 1000.
pub fn format_score(score: f64) -> String {
    if score >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0)
    } else if score >= 1_000.0 {
        format!("{:.1}K", score / 1_000.0)
    } else {
        score.to_string()
    }
}

/// Sort key of one entry. Variants are ordered by kind first so that mixed
/// columns still form a total order.
#[derive(Debug, Clone)]
enum SortKey {
    Number(f64),
    Date(NaiveDateTime),
    Text { folded: String, raw: String },
    Missing,
}

impl SortKey {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => SortKey::Number(f),
                None => SortKey::Missing,
            },
            Some(Value::String(s)) => match parse_datetime(s) {
                Some(date) => SortKey::Date(date),
                None => SortKey::text(s.clone()),
            },
            Some(other) => SortKey::text(display_string(other)),
        }
    }

    fn text(raw: String) -> Self {
        SortKey::Text {
            folded: raw.to_lowercase(),
            raw,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text { .. } => 2,
            SortKey::Missing => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => b.total_cmp(a),
            (SortKey::Date(a), SortKey::Date(b)) => b.cmp(a),
            (
                SortKey::Text { folded: fa, raw: ra },
                SortKey::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}
