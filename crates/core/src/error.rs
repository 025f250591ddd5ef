//! Unified error types for the curriculum resolver.
//!
//! Only genuinely exceptional conditions live here. A text block with no
//! date range in it is a skip, not an error, and a lookup that lands outside
//! the tolerance window surfaces as `Ok(None)` at the query boundary.

/// Unified error types for the resolver core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or unsupported URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response (network failure or non-2xx status).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Primary source page could not be fetched and no cached snapshot exists.
    #[error("SOURCE_UNAVAILABLE: {0}")]
    SourceUnavailable(String),
}
