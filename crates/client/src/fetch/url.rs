//! URL handling for the two upstream fetches.
//!
//! The overview page links its week pages with a mix of absolute URLs and
//! site-relative paths; `absolutize` folds both into one absolute form.

/// Error type for URL handling failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse and sanity-check an absolute http(s) URL.
///
/// Trims whitespace and strips any fragment; the query string is kept as-is
/// because the upstream uses it for language selection.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve a scraped href against the page it was found on.
///
/// Returns `None` for hrefs that cannot be made absolute (javascript:,
/// mailto:, malformed) so callers can treat them as "no link".
pub fn absolutize(base: &url::Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://example.com/study?lang=eng").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.query(), Some("lang=eng"));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_canonicalize_strips_fragment() {
        let url = canonicalize("https://example.com/page#section").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_rejects_ftp() {
        assert!(matches!(canonicalize("ftp://example.com"), Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_absolutize_relative_path() {
        let base = url::Url::parse("https://www.churchofjesuschrist.org/study/manual/overview?lang=eng").unwrap();
        let href = absolutize(&base, "/study/manual/overview/121-123?lang=eng").unwrap();
        assert_eq!(href, "https://www.churchofjesuschrist.org/study/manual/overview/121-123?lang=eng");
    }

    #[test]
    fn test_absolutize_absolute_href_kept() {
        let base = url::Url::parse("https://example.com/").unwrap();
        let href = absolutize(&base, "https://other.example.com/page").unwrap();
        assert_eq!(href, "https://other.example.com/page");
    }

    #[test]
    fn test_absolutize_rejects_javascript() {
        let base = url::Url::parse("https://example.com/").unwrap();
        assert!(absolutize(&base, "javascript:void(0)").is_none());
    }

    #[test]
    fn test_absolutize_empty_href() {
        let base = url::Url::parse("https://example.com/").unwrap();
        assert!(absolutize(&base, "  ").is_none());
    }
}
