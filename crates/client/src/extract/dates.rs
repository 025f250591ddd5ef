//! Date-range location and Monday resolution.
//!
//! The overview page embeds phrases like "Nov 3–9, 2025" or
//! "Dec 29–Jan 4" in arbitrary surrounding prose. `find_ranges` scans a text
//! block for every such phrase and resolves each to the Monday that begins
//! its week.
//!
//! Every date in the system is anchored at 12:00:00 UTC. The noon anchor is
//! a hard invariant: day arithmetic at midnight is one DST shift or timezone
//! offset away from landing on the wrong calendar day.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::{fold_dashes, squish};

/// A date-range phrase located in a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMatch {
    /// The matched phrase, dash-folded and squished but otherwise as scraped.
    pub span_text: String,
    /// Monday of the range's week, noon UTC.
    pub start: DateTime<Utc>,
}

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec";

/// Month abbrev + day, a dash, then either another month + day or a bare
/// day, optionally followed by a 4-digit year. Text is dash-folded before
/// matching so a single `-` covers hyphen/en/em inputs.
static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTHS})[a-z]*\s+\d{{1,2}}\s*-\s*(?:[a-z]+\s?)?\d{{1,2}}(?:,?\s*\d{{4}})?\b"
    ))
    .expect("invalid range pattern")
});

static FIRST_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({MONTHS})[a-z]*\s+(\d{{1,2}})")).expect("invalid month-day pattern")
});

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("invalid year pattern"));

fn month_number(token: &str) -> Option<u32> {
    let m = match &token[..token.len().min(3)] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// Construct a UTC datetime at the noon anchor.
pub fn noon_utc(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single()
}

/// Monday of the week containing `dt`, noon-anchored.
///
/// Sunday maps back six days; any other day maps to 1 - weekday.
pub fn monday_of(dt: DateTime<Utc>) -> DateTime<Utc> {
    let wd = dt.weekday().num_days_from_sunday() as i64;
    let diff = if wd == 0 { -6 } else { 1 - wd };
    dt + chrono::Duration::days(diff)
}

/// Year to assume when a scraped range carries none.
///
/// Defaults to the clock's UTC year, with a year-boundary adjustment: a
/// January range scraped in December belongs to next year, and a December
/// range scraped in January to the previous one.
pub fn default_year(today: DateTime<Utc>, month: u32) -> i32 {
    match (month, today.month()) {
        (1, 12) => today.year() + 1,
        (12, 1) => today.year() - 1,
        _ => today.year(),
    }
}

/// Resolve a single range phrase to the Monday of its week.
///
/// Returns `None` when no month/day can be parsed out of the phrase; that is
/// a skip signal, not an error.
pub fn parse_range_start(range_text: &str, today: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let t = squish(&fold_dashes(range_text)).to_lowercase();

    let caps = FIRST_MONTH_DAY.captures(&t)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;

    let year = match YEAR_PATTERN.captures(&t) {
        Some(y) => y[1].parse().ok()?,
        None => default_year(today, month),
    };

    Some(monday_of(noon_utc(year, month, day)?))
}

/// Scan a free-text block for date-range phrases.
///
/// Matching runs over a dash-folded, squished copy so dash variants and
/// wrapped whitespace cannot split a phrase; the span keeps its original
/// casing for traceability. Phrases whose dates do not resolve (e.g. a day
/// of 0 or 32) are dropped.
pub fn find_ranges(text: &str, today: DateTime<Utc>) -> Vec<RangeMatch> {
    let folded = squish(&fold_dashes(text));

    RANGE_PATTERN
        .find_iter(&folded)
        .filter_map(|m| {
            let span_text = m.as_str().to_string();
            let start = parse_range_start(&span_text, today)?;
            Some(RangeMatch { span_text, start })
        })
        .collect()
}

/// Resolve a human week label ("nov 3–nov 9") to its Monday.
///
/// Takes the first month/day found; used by diagnostics callers that hold a
/// label instead of a date.
pub fn monday_from_label(label: &str, today: DateTime<Utc>) -> Option<DateTime<Utc>> {
    parse_range_start(label, today)
}
