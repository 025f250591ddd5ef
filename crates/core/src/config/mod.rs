//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CFM_*)
//! 2. TOML config file (if CFM_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default overview page. Points at the current study year's manual and is
/// expected to be overridden once a year.
const DEFAULT_SOURCE_URL: &str = "https://www.churchofjesuschrist.org/study/manual/come-follow-me-for-home-and-church-doctrine-and-covenants-2025?lang=eng";

/// The upstream serves different markup (or nothing useful) to obviously
/// non-browser agents, so the default mimics a real browser.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CFM_*)
/// 2. TOML config file (if CFM_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the yearly curriculum overview page.
    ///
    /// Set via CFM_SOURCE_URL environment variable.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via CFM_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header value for HTTP requests.
    ///
    /// Set via CFM_ACCEPT_LANGUAGE environment variable.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via CFM_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CFM_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via CFM_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Seconds before a cached snapshot of the overview page goes stale.
    ///
    /// Set via CFM_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Slack, in days, when matching a target Monday to the nearest item.
    ///
    /// Set via CFM_TOLERANCE_DAYS environment variable.
    #[serde(default = "default_tolerance_days")]
    pub tolerance_days: i64,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.into()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_tolerance_days() -> i64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            cache_ttl_secs: default_cache_ttl_secs(),
            tolerance_days: default_tolerance_days(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CFM_`
    /// 2. TOML file from `CFM_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CFM_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CFM_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
