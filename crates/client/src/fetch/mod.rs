//! HTTP fetch pipeline for the overview and detail pages.
//!
//! The upstream is one fixed, trusted site, but it is picky about clients:
//! without a realistic browser User-Agent and an Accept-Language header it
//! can serve a stripped page with none of the schedule markup, which shows
//! up downstream as a silently empty item list. Both headers therefore go on
//! every request.
//!
//! Limits:
//! - Request timeout (default: 20s)
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)

pub mod url;

use std::time::{Duration, Instant};

use reqwest::{Client, header};

pub use url::{UrlError, absolutize, canonicalize};

use cfm_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string, expected to look like a real browser.
    pub user_agent: String,

    /// Accept-Language header value.
    pub accept_language: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

impl From<&cfm_core::AppConfig> for FetchConfig {
    fn from(cfg: &cfm_core::AppConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            accept_language: cfg.accept_language.clone(),
            max_bytes: cfg.max_bytes,
            timeout: cfg.timeout(),
            max_redirects: cfg.max_redirects,
        }
    }
}

/// HTTP fetch client with browser-shaped headers and size limits.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL and return the response body as text.
    ///
    /// Non-2xx statuses and oversized bodies are errors; the caller decides
    /// whether a failure is fatal (primary page, no cache) or not (detail
    /// page enrichment).
    pub async fn fetch_text(&self, url_str: &str) -> Result<String, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{}: {}", url, e))
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if body.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", body.len(), self.config.max_bytes)));
        }

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), body.len());

        Ok(body)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.accept_language, "en-US,en;q=0.9");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = cfm_core::AppConfig { timeout_ms: 5_000, max_bytes: 1024, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.timeout, Duration::from_millis(5_000));
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.user_agent, app.user_agent);
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let config = FetchConfig::default();
        let client = FetchClient::new(config);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_bad_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch_text("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
