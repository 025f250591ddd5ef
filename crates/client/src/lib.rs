//! Scraping, extraction, and caching pipeline for the curriculum resolver.
//!
//! This crate turns the yearly overview page into a mapping from calendar
//! week to lesson title and canonical scripture references:
//!
//! - [`fetch`]: HTTP pipeline with browser-shaped headers and size limits
//! - [`extract`]: date-range location, reference extraction, tidying, merging
//! - [`cache`]: TTL snapshot cache over the parsed page
//! - [`lookup`]: nearest-week resolution with detail-page enrichment

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod lookup;

pub use cache::{Clock, Fetcher, PageCache, SystemClock};
pub use extract::{extract_refs, find_ranges, monday_from_label, monday_of, noon_utc, scan_schedule, tidy_references};
pub use fetch::{FetchClient, FetchConfig};
pub use lookup::WeekResolver;
