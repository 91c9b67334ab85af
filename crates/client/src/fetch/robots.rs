//! robots.txt compliance, cached per host for the lifetime of a session.

use robotstxt_rs::RobotsTxt;
use std::collections::HashMap;
use tokio::sync::RwLock;
use url::Url;

/// Maximum size of robots.txt to fetch (1MB).
const MAX_ROBOTS_SIZE: usize = 1024 * 1024;

/// Error type for robots.txt operations.
#[derive(Debug, thiserror::Error)]
pub enum RobotsError {
    #[error("robots.txt disallowed: {path} (robots_url: {robots_url})")]
    Disallowed { path: String, robots_url: String },

    #[error("failed to fetch robots.txt: {0}")]
    FetchError(String),

    #[error("robots.txt too large")]
    TooLarge,
}

/// Per-host robots.txt rules shared by all workers of a session.
///
/// A crawl touches a handful of hosts, so entries are never evicted.
pub struct RobotsCache {
    cache: RwLock<HashMap<String, RobotsTxt>>,
    user_agent: String,
}

impl RobotsCache {
    /// Create an empty cache evaluating rules for `user_agent`.
    pub fn new(user_agent: String) -> Self {
        Self { cache: RwLock::new(HashMap::new()), user_agent }
    }

    fn robots_url(url: &Url) -> String {
        format!("{}://{}/robots.txt", url.scheme(), url.host_str().unwrap_or(""))
    }

    /// Check a URL against its host's robots.txt, fetching the rules on first use.
    pub async fn check(&self, http: &reqwest::Client, url: &Url) -> Result<(), RobotsError> {
        let robots_url = Self::robots_url(url);

        let cached = {
            let cache = self.cache.read().await;
            cache.get(&robots_url).map(|robots| robots.can_fetch(&self.user_agent, url.as_str()))
        };

        let allowed = match cached {
            Some(allowed) => allowed,
            None => {
                let robots = self.fetch_robots(http, &robots_url).await?;
                let allowed = robots.can_fetch(&self.user_agent, url.as_str());
                self.cache.write().await.insert(robots_url.clone(), robots);
                allowed
            }
        };

        if allowed { Ok(()) } else { Err(RobotsError::Disallowed { path: url.path().to_string(), robots_url }) }
    }

    /// Fetch robots.txt from the given URL.
    async fn fetch_robots(&self, http: &reqwest::Client, url: &str) -> Result<RobotsTxt, RobotsError> {
        let response = http.get(url).send().await.map_err(|e| RobotsError::FetchError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            if let Some(len) = response.content_length()
                && len as usize > MAX_ROBOTS_SIZE
            {
                return Err(RobotsError::TooLarge);
            }

            let bytes = response.bytes().await.map_err(|e| RobotsError::FetchError(e.to_string()))?;

            if bytes.len() > MAX_ROBOTS_SIZE {
                return Err(RobotsError::TooLarge);
            }

            Ok(RobotsTxt::parse(&String::from_utf8_lossy(&bytes)))
        } else if status.is_client_error() {
            tracing::debug!(robots_url = url, "robots.txt not found, allowing all");
            Ok(RobotsTxt::parse(""))
        } else {
            Err(RobotsError::FetchError(format!("status {}", status)))
        }
    }

    #[cfg(test)]
    async fn seed(&self, robots_url: &str, body: &str) {
        self.cache.write().await.insert(robots_url.to_string(), RobotsTxt::parse(body));
    }
}
