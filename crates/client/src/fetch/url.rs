//! URL parsing, link resolution and fragment stripping.

use url::Url;

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

impl From<UrlError> for lesekorpus_core::Error {
    fn from(err: UrlError) -> Self {
        lesekorpus_core::Error::InvalidUrl(err.to_string())
    }
}

fn check_scheme(url: Url) -> Result<Url, UrlError> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Parse an absolute seed URL.
///
/// Surrounding whitespace is trimmed and only `http`/`https` are accepted.
pub fn parse_absolute(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    check_scheme(parsed)
}

/// Resolve an `href` found on a page against the page URL.
///
/// Handles root-relative (`/wiki/x`), document-relative (`../x.html`) and
/// absolute references alike. `mailto:`, `javascript:` and other non-web
/// schemes are rejected.
pub fn resolve(base: &Url, href: &str) -> Result<Url, UrlError> {
    let trimmed = href.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let joined = base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    check_scheme(joined)
}

/// The URL with any `#...` fragment removed.
pub fn strip_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

/// Whether two URLs address the same document once fragments are ignored.
pub fn same_document(a: &Url, b: &Url) -> bool {
    strip_fragment(a) == strip_fragment(b)
}
