//! Week resolution: nearest-date lookup plus detail-page enrichment.
//!
//! This is the public face of the core. `resolve_week` always comes back
//! with either a populated answer or `Ok(None)`; nothing past the cache's
//! source-unavailable case escapes as an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::cache::{Clock, Fetcher, PageCache, SystemClock};
use crate::extract::{extract_refs, tidy_references};
use crate::fetch::{FetchClient, FetchConfig};
use cfm_core::{AppConfig, CurriculumItem, Error, MatchDebug, RangeSummary, WeekAnswer};

/// Content containers tried on a detail page, in order. Text from every
/// matching container is concatenated rather than first-wins, to maximize
/// recall on a page whose layout shifts.
const CONTENT_SELECTORS: &[&str] =
    &["[data-content]", "article", "main", ".article", ".content", ".study-content", ".body", ".layout", "body"];

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("invalid selector"));
static OG_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("invalid selector"));

/// Title and references recovered from a detail page.
struct DetailExtra {
    title: Option<String>,
    refs: Vec<String>,
}

/// Resolves a target Monday to its curriculum week.
pub struct WeekResolver {
    cache: PageCache,
    fetcher: Arc<dyn Fetcher>,
    tolerance_days: i64,
}

impl WeekResolver {
    /// Build a resolver with the real HTTP client and system clock.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = Arc::new(FetchClient::new(FetchConfig::from(config))?);
        Self::with_parts(fetcher, Arc::new(SystemClock), config)
    }

    /// Build a resolver over injected fetch/clock seams.
    pub fn with_parts(fetcher: Arc<dyn Fetcher>, clock: Arc<dyn Clock>, config: &AppConfig) -> Result<Self, Error> {
        let source_url = Url::parse(&config.source_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let cache = PageCache::new(Arc::clone(&fetcher), clock, source_url, config.cache_ttl());

        Ok(Self { cache, fetcher, tolerance_days: config.tolerance_days })
    }

    /// Resolve a target Monday to the nearest known week within tolerance.
    ///
    /// When the matched item carries no references but does have a detail
    /// link, the detail page is fetched and re-scanned; a failure there is
    /// non-fatal. The final reference list always goes through the tidier.
    pub async fn resolve_week(&self, target: DateTime<Utc>) -> Result<Option<WeekAnswer>, Error> {
        let items = self.cache.get_items().await?;

        let Some(best) = nearest(&items, target, self.tolerance_days) else {
            tracing::debug!("no item within {} days of {}", self.tolerance_days, target);
            return Ok(None);
        };

        let mut title = best.title.clone();
        let mut refs = best.refs.clone();

        if refs.is_empty()
            && let Some(href) = best.href.as_deref()
            && let Some(extra) = self.enrich(href).await
        {
            if title.len() < 4
                && let Some(t) = extra.title
            {
                title = t;
            }
            refs = extra.refs;
        }

        let references = tidy_references(&refs, best.href.as_deref());

        Ok(Some(WeekAnswer {
            title,
            references,
            debug: MatchDebug {
                matched_range: best.range_text.clone(),
                matched_start_iso: best.start.to_rfc3339(),
                href: best.href.clone(),
            },
        }))
    }

    /// Diagnostics listing of every known week.
    pub async fn list_ranges(&self) -> Result<Vec<RangeSummary>, Error> {
        let items = self.cache.get_items().await?;

        Ok(items
            .iter()
            .map(|item| RangeSummary {
                range: item.range_text.clone(),
                start_iso: item.start.to_rfc3339(),
                href: item.href.clone(),
                refs_sample: item.refs.iter().take(3).cloned().collect(),
                title: item.title.clone(),
            })
            .collect())
    }

    /// Recover title and references from a week's detail page.
    ///
    /// Any fetch or parse trouble here yields `None` and the caller keeps
    /// whatever it already had.
    async fn enrich(&self, href: &str) -> Option<DetailExtra> {
        let html = match self.fetcher.fetch_text(href).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("detail fetch failed for {}: {}", href, e);
                return None;
            }
        };

        let document = Html::parse_document(&html);

        let mut body_text = String::new();
        for sel in CONTENT_SELECTORS {
            let selector = Selector::parse(sel).expect("invalid selector");
            for container in document.select(&selector) {
                body_text.push(' ');
                body_text.push_str(&container.text().collect::<Vec<_>>().join(" "));
            }
        }

        let refs = extract_refs(&body_text);

        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|h1| h1.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                document
                    .select(&OG_TITLE_SELECTOR)
                    .next()
                    .and_then(|meta| meta.value().attr("content"))
                    .map(|c| c.trim().to_string())
            });

        Some(DetailExtra { title, refs })
    }
}

/// Nearest item by rounded absolute day distance, `None` past tolerance.
/// Strict `<` over the ascending set makes the earliest item win a tie.
fn nearest<'a>(items: &'a [CurriculumItem], target: DateTime<Utc>, tolerance_days: i64) -> Option<&'a CurriculumItem> {
    let mut best: Option<(&CurriculumItem, i64)> = None;

    for item in items {
        let distance = days_between(item.start, target).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((item, distance));
        }
    }

    match best {
        Some((item, distance)) if distance <= tolerance_days => Some(item),
        _ => None,
    }
}

/// Rounded whole-day distance, so a midnight target still lands on the
/// noon-anchored item one calendar day away.
///
/// Half-day ties round away from zero, symmetrically: a target exactly 3.5
/// days before or after an item reads as 4 days out, past a 3-day tolerance
/// on both sides.
fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    ((a - b).num_seconds() as f64 / 86_400.0).round() as i64
}
