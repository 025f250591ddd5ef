//! Shared data types for the curriculum resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One distinct week discovered on the overview page.
///
/// `start` is the Monday that begins the week, anchored at noon UTC; it is
/// the item's natural key. `range_text` keeps the raw scraped phrase for
/// traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    /// Raw date-range phrase as scraped, e.g. "Nov 3–9, 2025".
    pub range_text: String,
    /// Monday of the week, noon UTC.
    pub start: DateTime<Utc>,
    /// Best-known lesson title. Empty string when nothing was found.
    pub title: String,
    /// Scripture citations discovered so far, insertion order, deduped.
    pub refs: Vec<String>,
    /// Absolute URL of the week's detail page, when one was found.
    pub href: Option<String>,
}

/// Debug payload carried alongside a resolved week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDebug {
    /// The raw range phrase the target date matched against.
    pub matched_range: String,
    /// ISO-8601 start of the matched week.
    pub matched_start_iso: String,
    /// Detail link of the matched item, if any.
    pub href: Option<String>,
}

/// Final answer for a resolved week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekAnswer {
    pub title: String,
    pub references: Vec<String>,
    pub debug: MatchDebug,
}

/// One diagnostics row from the listing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSummary {
    pub range: String,
    pub start_iso: String,
    pub href: Option<String>,
    /// First few references only, enough to eyeball a row.
    pub refs_sample: Vec<String>,
    pub title: String,
}
