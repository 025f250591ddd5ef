//! Scripture reference extraction from free text.
//!
//! A curated alternation of volume names (plus numbered variants) anchors
//! each match; the capture runs from the volume name to the next
//! sentence-ish boundary. Matching happens on normalized lowercase text and
//! a substitution table restores the one canonical spelling that matters:
//! the bare "d&c" abbreviation always comes back as its full volume name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::normalize::{matchable, squish};

/// Canonical name for the revelatory volume the page abbreviates as "D&C".
pub const CANON_VOLUME: &str = "Doctrine and Covenants";

/// Volume token plus trailing characters up to a period, semicolon, pipe,
/// or closing bracket.
static BOOK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:[123]\s?)?(?:nephi|jacob|enos|jarom|omni|words of mormon|mosiah|alma|helaman|4 nephi|mormon|ether|moroni|matthew|mark|luke|john|acts|romans|psalms|isaiah|moses|abraham|doctrine and covenants|d&c|joseph smith-history|pearl of great price)\b[^.|;)\]]*",
    )
    .expect("invalid book pattern")
});

static ABBREV_VOLUME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(d&c|doctrine\s+and\s+cov(?:e|a)nants)\b").expect("invalid volume pattern")
});

/// Rewrite abbreviated or misspelled volume names to the canonical form.
pub fn canon_volume(s: &str) -> String {
    ABBREV_VOLUME.replace_all(s, CANON_VOLUME).into_owned()
}

/// Extract candidate scripture citations from a text block.
///
/// Order-preserving and deduplicated by exact string after normalization.
pub fn extract_refs(raw: &str) -> Vec<String> {
    let txt = matchable(raw);

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for m in BOOK_PATTERN.find_iter(&txt) {
        let candidate = squish(&canon_volume(m.as_str()));
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    }

    out
}
