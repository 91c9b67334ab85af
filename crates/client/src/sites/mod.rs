//! Site family crawls built from the shared primitives.
//!
//! A crawl is picked by the layout of the profile's first seed:
//! category listings go to [`wiki`], book indexes to [`gutenberg`] and
//! TOC/print pages to [`wikijunior`].

pub mod gutenberg;
pub mod wiki;
pub mod wikijunior;

pub use gutenberg::crawl_gutenberg;
pub use wiki::crawl_wiki;
pub use wikijunior::crawl_wikijunior;

use lesekorpus_core::{BookRecord, Error, Layout, SiteProfile, TocRecord, WikiRecord};
use serde::Serialize;
use std::sync::Arc;

use crate::crawl::{DEFAULT_WORKERS, FetchScheduler, progress_bar};
use crate::fetch::PageSource;

/// What every site crawl shares: the session, pool size and limits.
#[derive(Clone)]
pub struct CrawlContext {
    pub source: Arc<dyn PageSource>,
    pub workers: usize,
    /// Meaning depends on the family: category pages, books or book pages.
    pub max_pages: Option<usize>,
    pub progress: bool,
}

impl CrawlContext {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source, workers: DEFAULT_WORKERS, max_pages: None, progress: false }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// A scheduler over the shared source, with a bar for `len` items.
    pub(crate) fn scheduler(&self, len: usize, message: &str) -> FetchScheduler {
        FetchScheduler::new(Arc::clone(&self.source), self.workers).with_progress(progress_bar(len, message, self.progress))
    }
}

/// The records of one crawl, serialized as a flat JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    Wiki(Vec<WikiRecord>),
    Books(Vec<BookRecord>),
    Toc(Vec<TocRecord>),
}

impl Dataset {
    pub fn len(&self) -> usize {
        match self {
            Dataset::Wiki(records) => records.len(),
            Dataset::Books(records) => records.len(),
            Dataset::Toc(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the crawl the profile's seeds call for.
pub async fn crawl_site(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Dataset, Error> {
    let layout = profile
        .seeds
        .first()
        .map(|seed| seed.layout)
        .ok_or_else(|| Error::InvalidProfile(format!("{} has no seeds", profile.name)))?;

    tracing::info!(site = %profile.name, workers = ctx.workers, max_pages = ?ctx.max_pages, "starting crawl");

    let dataset = match layout {
        Layout::CategoryListing => Dataset::Wiki(crawl_wiki(profile, ctx).await?),
        Layout::BookIndex => Dataset::Books(crawl_gutenberg(profile, ctx).await?),
        Layout::TableOfContents | Layout::PrintVersion => Dataset::Toc(crawl_wikijunior(profile, ctx).await?),
    };

    tracing::info!(site = %profile.name, records = dataset.len(), "crawl finished");
    Ok(dataset)
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySite;
    use super::*;

    #[tokio::test]
    async fn test_crawl_site_without_seeds() {
        let profile = SiteProfile { seeds: vec![], ..SiteProfile::klexikon() };
        let ctx = CrawlContext::new(Arc::new(MemorySite::default()));

        let result = crawl_site(&profile, &ctx).await;
        assert!(matches!(result, Err(Error::InvalidProfile(_))));
    }

    #[tokio::test]
    async fn test_crawl_site_dispatches_on_layout() {
        let ctx = CrawlContext::new(Arc::new(MemorySite::default()));

        let dataset = crawl_site(&SiteProfile::gutenberg(), &ctx).await.unwrap();
        assert_eq!(dataset, Dataset::Books(vec![]));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_dataset_serializes_as_plain_array() {
        let dataset = Dataset::Toc(vec![TocRecord {
            book_title: "Wikijunior Europa".into(),
            chapter: "Introduction".into(),
            link_text: "Introduction".into(),
            wiki_link: "https://de.wikibooks.org/wiki/Wikijunior_Europa/_Druckversion".into(),
            paragraphs: vec!["Europa ist ein Kontinent.".into()],
        }]);

        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.starts_with("[{"));
        assert!(json.contains("\"BookTitle\":\"Wikijunior Europa\""));
    }
}
