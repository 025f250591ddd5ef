//! In-process snapshot cache for the overview page.
//!
//! One snapshot of the parsed schedule lives behind the cache at a time,
//! replaced wholesale on refresh. The upstream changes weekly at most, so a
//! short TTL bounds load without risking staleness that matters. Clock and
//! fetcher are injected so tests can advance time and serve canned HTML.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use url::Url;

use crate::extract::scan_schedule;
use crate::fetch::FetchClient;
use cfm_core::{CurriculumItem, Error};

/// Seam over HTTP so the cache and resolver can be driven by canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, Error>;
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        FetchClient::fetch_text(self, url).await
    }
}

/// Seam over wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One fully-formed parse of the overview page.
struct Snapshot {
    fetched_at: DateTime<Utc>,
    items: Arc<Vec<CurriculumItem>>,
}

/// TTL cache over the overview page's parsed schedule.
pub struct PageCache {
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    source_url: Url,
    ttl: Duration,
    state: Mutex<Option<Snapshot>>,
}

impl PageCache {
    pub fn new(fetcher: Arc<dyn Fetcher>, clock: Arc<dyn Clock>, source_url: Url, ttl: Duration) -> Self {
        Self { fetcher, clock, source_url, ttl, state: Mutex::new(None) }
    }

    /// Current schedule items, refreshing first if the snapshot is missing
    /// or stale.
    ///
    /// The refresh runs while holding the state lock, which gives
    /// single-flight behavior: a second caller whose TTL also expired awaits
    /// this refresh instead of issuing a duplicate fetch. A failed refresh
    /// falls back to the stale snapshot when one exists; with no snapshot at
    /// all the failure propagates as `SourceUnavailable`.
    pub async fn get_items(&self) -> Result<Arc<Vec<CurriculumItem>>, Error> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if let Some(snapshot) = state.as_ref()
            && is_fresh(snapshot.fetched_at, now, self.ttl)
        {
            return Ok(Arc::clone(&snapshot.items));
        }

        match self.refresh(now).await {
            Ok(items) => {
                let items = Arc::new(items);
                *state = Some(Snapshot { fetched_at: now, items: Arc::clone(&items) });
                Ok(items)
            }
            Err(e) => match state.as_ref() {
                Some(snapshot) => {
                    tracing::warn!("refresh failed, serving stale snapshot: {}", e);
                    Ok(Arc::clone(&snapshot.items))
                }
                None => Err(Error::SourceUnavailable(e.to_string())),
            },
        }
    }

    async fn refresh(&self, now: DateTime<Utc>) -> Result<Vec<CurriculumItem>, Error> {
        let html = self.fetcher.fetch_text(self.source_url.as_str()).await?;
        Ok(scan_schedule(&html, &self.source_url, now))
    }
}

/// Stale once the snapshot's age exceeds the TTL. A clock that went
/// backwards reads as stale rather than panicking.
fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    (now - fetched_at).to_std().map(|age| age <= ttl).unwrap_or(false)
}
