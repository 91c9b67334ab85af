//! HTTP fetch pipeline and the page source seam.
//!
//! ### Session
//! - One `FetchClient` per run, shared by every worker through `Arc<dyn PageSource>`.
//! - No retries: a failed fetch is reported once and the caller moves on.
//!
//! ### Safety Gates
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Optional robots.txt compliance, cached per host.
//!
//! ### Decoding
//! - Pages are decoded with the charset the server declares, falling back to UTF-8.
//! - Profiles with `force_utf8` ignore the declared charset (Projekt Gutenberg
//!   labels UTF-8 pages as Latin-1).

pub mod robots;
pub mod url;

use async_trait::async_trait;
use lesekorpus_core::{AppConfig, Error};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

pub use robots::{RobotsCache, RobotsError};
pub use self::url::{UrlError, parse_absolute, resolve, same_document, strip_fragment};

/// Source of raw HTML pages.
///
/// The crawl primitives only talk to this trait, so tests can serve pages
/// from memory and the real session can be swapped without touching them.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a page and decode it to text.
    async fn fetch_html(&self, url: &Url, force_utf8: bool) -> Result<String, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "lesekorpus/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Whether to respect robots.txt (default: true)
    pub respect_robots: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "lesekorpus/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            respect_robots: true,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            respect_robots: config.respect_robots,
            ..Default::default()
        }
    }
}

/// HTTP session shared by all workers of a crawl.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    robots_cache: RobotsCache,
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::FetchTimeout(err.to_string()) } else { Error::HttpError(format!("network error: {}", err)) }
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

        let robots_cache = RobotsCache::new(config.user_agent.clone());

        Ok(Self { http, config, robots_cache })
    }

    fn check_size(&self, len: usize) -> Result<(), Error> {
        if len > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }
        Ok(())
    }

    /// Fetch a URL and decode its body.
    ///
    /// Checks robots.txt (if enabled), rejects non-2xx statuses and enforces
    /// the byte limit.
    pub async fn fetch(&self, url: &Url, force_utf8: bool) -> Result<String, Error> {
        let start = Instant::now();

        if self.config.respect_robots {
            self.robots_cache
                .check(&self.http, url)
                .await
                .map_err(|e| Error::RobotsDisallowed(e.to_string()))?;
        }

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }

        let final_url = response.url().clone();

        let body = if force_utf8 {
            let bytes = response.bytes().await.map_err(transport_error)?;
            self.check_size(bytes.len())?;
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            let text = response.text().await.map_err(|e| Error::DecodeFailed(e.to_string()))?;
            self.check_size(text.len())?;
            text
        };

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(url = %url, final_url = %final_url, fetch_ms, bytes = body.len(), "fetched page");

        Ok(body)
    }
}

#[async_trait]
impl PageSource for FetchClient {
    async fn fetch_html(&self, url: &Url, force_utf8: bool) -> Result<String, Error> {
        self.fetch(url, force_utf8).await
    }
}
