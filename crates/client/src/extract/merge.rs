//! Consolidation of per-element observations into one item per week.
//!
//! The DOM-wide scan visits nested elements, so the same week is usually
//! observed several times at different depths with different subsets of its
//! fields. Merging is improve-only: a later observation can fill a missing
//! href or title, or replace the reference list with a longer one, but it
//! can never clear a field that was already set.

use std::collections::BTreeMap;

use cfm_core::CurriculumItem;
use chrono::{DateTime, Utc};

/// One raw sighting of a week at some DOM location.
#[derive(Debug, Clone)]
pub struct Observation {
    pub range_text: String,
    pub start: DateTime<Utc>,
    pub title: String,
    pub refs: Vec<String>,
    pub href: Option<String>,
}

/// Fold observations into one `CurriculumItem` per distinct start Monday,
/// sorted ascending by start.
pub fn merge_observations(observations: impl IntoIterator<Item = Observation>) -> Vec<CurriculumItem> {
    let mut by_start: BTreeMap<DateTime<Utc>, CurriculumItem> = BTreeMap::new();

    for obs in observations {
        match by_start.get_mut(&obs.start) {
            None => {
                by_start.insert(
                    obs.start,
                    CurriculumItem {
                        range_text: obs.range_text,
                        start: obs.start,
                        title: obs.title,
                        refs: obs.refs,
                        href: obs.href,
                    },
                );
            }
            Some(existing) => {
                if existing.href.is_none() && obs.href.is_some() {
                    existing.href = obs.href;
                }
                // longer list means the match landed closer to the full row
                if obs.refs.len() > existing.refs.len() {
                    existing.refs = obs.refs;
                }
                if existing.title.is_empty() && !obs.title.is_empty() {
                    existing.title = obs.title;
                }
            }
        }
    }

    by_start.into_values().collect()
}
