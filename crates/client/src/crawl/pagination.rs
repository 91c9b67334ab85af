//! Sequential walk along a chain of "next" links.
//!
//! ### State machine
//! `Fetching(url) → Extracting → Advancing(next) → Done`, where `Done` carries
//! the terminal reason. A failed fetch or harvest ends in `Done(Failed)` and
//! keeps everything collected from earlier pages.
//!
//! A next link back to any page already walked ends the walk, so both
//! self-links and longer loops (`a → b → a`) stop.

use lesekorpus_core::{Error, NextLinkRule};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

use crate::extract::find_next_link;
use crate::fetch::PageSource;

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The last page had no next link.
    Exhausted,
    /// The next link pointed at a page already walked.
    CycleDetected(Url),
    /// The configured page limit was reached.
    PageLimit,
    /// Fetching or harvesting this page failed.
    Failed(Url),
}

/// Everything a walk collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk<T> {
    /// Harvested items, in page order.
    pub items: Vec<T>,
    /// Pages fetched successfully.
    pub pages: usize,
    pub outcome: WalkOutcome,
}

enum WalkState {
    Fetching(Url),
    Extracting { url: Url, html: String },
    Advancing { current: Url, next: Option<Url> },
    Done(WalkOutcome),
}

/// Walks one chain of pages through a [`PageSource`].
pub struct PaginationWalker<'a> {
    source: &'a dyn PageSource,
    next_link: NextLinkRule,
    force_utf8: bool,
    max_pages: Option<usize>,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(source: &'a dyn PageSource, next_link: NextLinkRule) -> Self {
        Self { source, next_link, force_utf8: false, max_pages: None }
    }

    pub fn force_utf8(mut self, force_utf8: bool) -> Self {
        self.force_utf8 = force_utf8;
        self
    }

    /// Stop after this many pages. `None` walks until the chain ends.
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Walk from `seed`, running `harvest` on every fetched page.
    ///
    /// Pages are fetched strictly one after another.
    pub async fn walk<T, F>(&self, seed: Url, mut harvest: F) -> Walk<T>
    where
        T: Send,
        F: FnMut(&Html, &Url) -> Result<Vec<T>, Error> + Send,
    {
        let mut items = Vec::new();
        let mut pages = 0;
        let mut visited = HashSet::new();
        let mut state = WalkState::Fetching(seed);

        let outcome = loop {
            state = match state {
                WalkState::Fetching(url) => {
                    tracing::debug!(url = %url, page = pages + 1, "fetching page");
                    match self.source.fetch_html(&url, self.force_utf8).await {
                        Ok(html) => {
                            pages += 1;
                            visited.insert(url.clone());
                            WalkState::Extracting { url, html }
                        }
                        Err(e) => {
                            tracing::warn!(url = %url, error = %e, "page fetch failed");
                            WalkState::Done(WalkOutcome::Failed(url))
                        }
                    }
                }
                WalkState::Extracting { url, html } => match harvest_page(&html, &url, &self.next_link, &mut harvest) {
                    Ok((found, next)) => {
                        items.extend(found);
                        WalkState::Advancing { current: url, next }
                    }
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "page harvest failed");
                        WalkState::Done(WalkOutcome::Failed(url))
                    }
                },
                WalkState::Advancing { current, next } => match next {
                    None => WalkState::Done(WalkOutcome::Exhausted),
                    Some(next) if visited.contains(&next) => {
                        tracing::warn!(url = %current, next = %next, "next link points at a walked page, stopping");
                        WalkState::Done(WalkOutcome::CycleDetected(next))
                    }
                    Some(_) if self.max_pages.is_some_and(|max| pages >= max) => {
                        tracing::debug!(pages, "page limit reached");
                        WalkState::Done(WalkOutcome::PageLimit)
                    }
                    Some(next) => WalkState::Fetching(next),
                },
                WalkState::Done(outcome) => break outcome,
            };
        };

        Walk { items, pages, outcome }
    }
}

/// Parse one page, harvest it and look up its next link.
///
/// Kept synchronous so the parsed tree is dropped before the next fetch.
fn harvest_page<T, F>(html: &str, url: &Url, rule: &NextLinkRule, harvest: &mut F) -> Result<(Vec<T>, Option<Url>), Error>
where
    F: FnMut(&Html, &Url) -> Result<Vec<T>, Error>,
{
    let doc = Html::parse_document(html);
    let found = harvest(&doc, url)?;
    let next = find_next_link(&doc, url, rule)?;
    Ok((found, next))
}
