//! Heuristic extraction pipeline for the curriculum overview page.
//!
//! The upstream markup is not versioned and reshuffles over time, so the
//! scan is deliberately broad: every anchor, section, article, list item,
//! and div is a candidate text block ("scan broadly, filter precisely").
//! Each layer below it is a small pure function over text, testable and
//! replaceable on its own:
//!
//! raw page -> candidate blocks -> date ranges ([`dates`]) -> raw
//! references ([`refs`]) -> merged items ([`merge`]) -> tidied answer
//! ([`tidy`]).

pub mod dates;
pub mod merge;
pub mod normalize;
pub mod refs;
pub mod tidy;

pub use dates::{RangeMatch, find_ranges, monday_from_label, monday_of, noon_utc};
pub use merge::{Observation, merge_observations};
pub use refs::extract_refs;
pub use tidy::tidy_references;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::fetch::url::absolutize;
use cfm_core::CurriculumItem;
use normalize::squish;

/// Lesson titles on the page are set in curly quotes.
static QUOTED_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new("\u{201c}[^\u{201d}]+\u{201d}").expect("invalid title pattern"));

/// Scan a full overview page into merged curriculum items.
///
/// Elements whose text contains no date range are skipped; everything else
/// becomes an observation, and nested sightings of the same week collapse
/// in the merge step.
pub fn scan_schedule(html: &str, base: &Url, today: DateTime<Utc>) -> Vec<CurriculumItem> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a, section, article, li, div").expect("invalid selector");

    let mut observations = Vec::new();

    for element in document.select(&selector) {
        let raw = element.text().collect::<Vec<_>>().join(" ");

        let Some(range) = find_ranges(&raw, today).into_iter().next() else {
            continue;
        };

        observations.push(Observation {
            range_text: range.span_text,
            start: range.start,
            title: pull_title(&raw),
            refs: extract_refs(&raw),
            href: hunt_href(element, base),
        });
    }

    let items = merge_observations(observations);
    tracing::debug!("scanned {} schedule items", items.len());
    items
}

/// Best-effort title from a candidate block: the first curly-quoted
/// segment, else the first chunk before a separator.
fn pull_title(raw: &str) -> String {
    let text = squish(raw);

    if let Some(m) = QUOTED_TITLE.find(&text) {
        return m.as_str().trim_matches(|c| c == '\u{201c}' || c == '\u{201d}').trim().to_string();
    }

    // split before squishing, so a newline still separates segments
    squish(raw.split(['|', '\u{2022}', '\n', '.']).next().unwrap_or(""))
}

/// Hunt the week link for an element: the element itself if it is an
/// anchor, else its first descendant anchor, else its nearest ancestor
/// anchor. Relative hrefs resolve against the page URL.
fn hunt_href(element: ElementRef<'_>, base: &Url) -> Option<String> {
    if element.value().name() == "a"
        && let Some(href) = element.value().attr("href")
        && let Some(resolved) = absolutize(base, href)
    {
        return Some(resolved);
    }

    let anchor = Selector::parse("a[href]").expect("invalid selector");
    if let Some(child) = element.select(&anchor).next()
        && let Some(href) = child.value().attr("href")
        && let Some(resolved) = absolutize(base, href)
    {
        return Some(resolved);
    }

    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|a| a.value().name() == "a")
        .find_map(|a| a.value().attr("href").and_then(|href| absolutize(base, href)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <main>
                <ul>
                    <li>
                        <a href="/study/manual/overview/121-123?lang=eng">
                            Nov 3–9, 2025 • “Be Thou Humble” • Doctrine and Covenants 121–123
                        </a>
                    </li>
                    <li>
                        <a href="/study/manual/overview/124?lang=eng">
                            Nov 10–16, 2025 • “A House unto My Name” • Doctrine and Covenants 124
                        </a>
                    </li>
                </ul>
                <div>Unrelated prose with no dates in it at all.</div>
            </main>
        </body>
        </html>
    "#;

    fn base() -> Url {
        Url::parse("https://www.churchofjesuschrist.org/study/manual/overview?lang=eng").unwrap()
    }

    fn today() -> DateTime<Utc> {
        noon_utc(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_scan_schedule_end_to_end() {
        let items = scan_schedule(SCHEDULE_HTML, &base(), today());

        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.start, noon_utc(2025, 11, 3).unwrap());
        assert_eq!(first.title, "Be Thou Humble");
        assert!(first.refs.iter().any(|r| r.contains("Doctrine and Covenants 121-123")));
        assert_eq!(
            first.href.as_deref(),
            Some("https://www.churchofjesuschrist.org/study/manual/overview/121-123?lang=eng")
        );
    }

    #[test]
    fn test_scan_schedule_sorted_and_unique() {
        let items = scan_schedule(SCHEDULE_HTML, &base(), today());
        assert!(items[0].start < items[1].start);
    }

    #[test]
    fn test_scan_schedule_empty_page() {
        let items = scan_schedule("<html><body><p>nothing</p></body></html>", &base(), today());
        assert!(items.is_empty());
    }

    #[test]
    fn test_scan_schedule_text_inside_anchor_child() {
        // range lives in a div nested inside the anchor; href comes from the ancestor
        let html = r#"
            <html><body>
                <a href="/study/manual/overview/1-5?lang=eng">
                    <div><span>Jan 6–12, 2025</span><span>“Hearken, O Ye People”</span></div>
                </a>
            </body></html>
        "#;

        let items = scan_schedule(html, &base(), today());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].start, noon_utc(2025, 1, 6).unwrap());
        assert_eq!(items[0].title, "Hearken, O Ye People");
        assert_eq!(
            items[0].href.as_deref(),
            Some("https://www.churchofjesuschrist.org/study/manual/overview/1-5?lang=eng")
        );
    }

    #[test]
    fn test_pull_title_quoted() {
        assert_eq!(pull_title("Nov 3–9, 2025 • “Be Thou Humble” • refs"), "Be Thou Humble");
    }

    #[test]
    fn test_pull_title_first_segment_fallback() {
        assert_eq!(pull_title("Lesson overview | Nov 3–9"), "Lesson overview");
    }

    #[test]
    fn test_pull_title_newline_separates() {
        assert_eq!(pull_title("Hearken, O Ye People\nJan 6–12, 2025"), "Hearken, O Ye People");
    }
}
