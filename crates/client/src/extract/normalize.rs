//! Text normalization shared by the heuristic extractors.
//!
//! The upstream page mixes hyphens, en-dashes, and em-dashes freely from one
//! week to the next, and date phrases wrap across text nodes. Every matcher
//! therefore works on text that has been dash-folded and
//! whitespace-squished first.

/// Fold the unicode dash block (U+2010..U+2015) to a plain ASCII hyphen.
pub fn fold_dashes(s: &str) -> String {
    s.chars().map(|c| if ('\u{2010}'..='\u{2015}').contains(&c) { '-' } else { c }).collect()
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn squish(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full matching form: dash-folded, squished, lowercased.
pub fn matchable(s: &str) -> String {
    squish(&fold_dashes(s)).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_dashes_all_variants() {
        assert_eq!(fold_dashes("3\u{2010}9"), "3-9");
        assert_eq!(fold_dashes("3\u{2013}9"), "3-9"); // en dash
        assert_eq!(fold_dashes("3\u{2014}9"), "3-9"); // em dash
        assert_eq!(fold_dashes("3-9"), "3-9");
    }

    #[test]
    fn test_fold_dashes_idempotent() {
        let once = fold_dashes("Nov 3–9");
        assert_eq!(fold_dashes(&once), once);
    }

    #[test]
    fn test_squish() {
        assert_eq!(squish("  Nov   3–9,\n 2025  "), "Nov 3–9, 2025");
    }

    #[test]
    fn test_matchable() {
        assert_eq!(matchable("  Nov 3\u{2013}9,  2025 "), "nov 3-9, 2025");
    }
}
