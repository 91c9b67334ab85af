//! Unified error types for lesekorpus.
//!
//! Every variant is recoverable at the crawl level: a failing work item is
//! logged with its URL and degraded to empty content, it never aborts a run.

/// Unified error types for fetching and extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL could not be parsed or resolved.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Transport gave up waiting.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Robots.txt disallowed access.
    #[error("ROBOTS_DISALLOWED: {0}")]
    RobotsDisallowed(String),

    /// A profile carried a CSS selector scraper could not parse.
    #[error("INVALID_SELECTOR: {0}")]
    InvalidSelector(String),

    /// Response body could not be decoded as text.
    #[error("DECODE_FAILED: {0}")]
    DecodeFailed(String),

    /// A site profile lacks a rule the requested crawl needs.
    #[error("INVALID_PROFILE: {0}")]
    InvalidProfile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HttpError("status 404".to_string());
        assert!(err.to_string().contains("HTTP_ERROR"));
        assert!(err.to_string().contains("404"));
    }
}
