//! Projekt Gutenberg: a reading-tips index of books, each a chain of pages.

use async_trait::async_trait;
use lesekorpus_core::{Book, BookEntry, BookRecord, Error, IndexRule, Layout, NextLinkRule, SiteProfile};
use scraper::Html;
use std::sync::Arc;
use url::Url;

use super::CrawlContext;
use crate::crawl::{PaginationWalker, WorkItem};
use crate::extract::{Extractor, ProfileExtractor, join_blocks, parse_book_index, split_sentences};
use crate::fetch::{PageSource, parse_absolute};

/// One book: walk its pages via the next link and segment the joined text.
pub struct BookUnit {
    entry: BookEntry,
    extractor: Arc<ProfileExtractor>,
    next_link: NextLinkRule,
    force_utf8: bool,
}

impl BookUnit {
    pub fn new(entry: BookEntry, extractor: Arc<ProfileExtractor>, next_link: NextLinkRule, force_utf8: bool) -> Self {
        Self { entry, extractor, next_link, force_utf8 }
    }
}

#[async_trait]
impl WorkItem for BookUnit {
    type Output = Book;

    async fn process(&self, source: &dyn PageSource) -> Book {
        let start = match parse_absolute(&self.entry.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = %self.entry.url, error = %e, "invalid book link");
                return self.degraded();
            }
        };

        let extractor = Arc::clone(&self.extractor);
        let walk = PaginationWalker::new(source, self.next_link.clone())
            .force_utf8(self.force_utf8)
            .walk(start, move |doc, url| {
                let page = join_blocks(&extractor.blocks(doc)?);
                if page.is_empty() {
                    tracing::debug!(url = %url, "no text between page markers");
                }
                Ok(vec![page])
            })
            .await;

        tracing::debug!(book = %self.entry.title, pages = walk.pages, outcome = ?walk.outcome, "book walked");

        let sentences = split_sentences(&walk.items.join(" "));
        Book { pages: walk.items, sentences, ..self.degraded() }
    }

    fn degraded(&self) -> Book {
        Book {
            category_id: self.entry.category_id.clone(),
            title: self.entry.title.clone(),
            url: self.entry.url.clone(),
            ..Default::default()
        }
    }

    fn url(&self) -> &str {
        &self.entry.url
    }
}

fn book_entries(html: &str, url: &Url, rule: &IndexRule) -> Result<Vec<BookEntry>, Error> {
    parse_book_index(&Html::parse_document(html), url, rule)
}

/// Fetch every book index seed and list its books, capped at `max_pages` books.
///
/// An index that cannot be fetched contributes no books.
pub async fn collect_books(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Vec<BookEntry>, Error> {
    let rule = profile
        .index
        .as_ref()
        .ok_or_else(|| Error::InvalidProfile(format!("{} has no index rule", profile.name)))?;

    let mut books = Vec::new();
    for seed in profile.seeds.iter().filter(|seed| seed.layout == Layout::BookIndex) {
        let url = parse_absolute(&seed.url)?;
        match ctx.source.fetch_html(&url, profile.force_utf8).await {
            Ok(html) => books.extend(book_entries(&html, &url, rule)?),
            Err(e) => tracing::warn!(url = %url, error = %e, "book index fetch failed"),
        }
    }

    if let Some(max) = ctx.max_pages {
        books.truncate(max);
    }

    tracing::info!(books = books.len(), "book index parsed");
    Ok(books)
}

/// Crawl every indexed book into records numbered from 1.
pub async fn crawl_gutenberg(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Vec<BookRecord>, Error> {
    let next_link = profile
        .next_link
        .clone()
        .ok_or_else(|| Error::InvalidProfile(format!("{} has no next link rule", profile.name)))?;

    let books = collect_books(profile, ctx).await?;
    let extractor = Arc::new(ProfileExtractor::new(profile));

    let units: Vec<_> = books
        .into_iter()
        .map(|entry| BookUnit::new(entry, Arc::clone(&extractor), next_link.clone(), profile.force_utf8))
        .collect();

    let results = ctx.scheduler(units.len(), "Bücher").run(units).await;

    Ok(results
        .into_iter()
        .map(|done| BookRecord {
            id: done.id,
            category_id: done.output.category_id,
            book_link: done.output.url,
            book_title: done.output.title,
            sentences: done.output.sentences,
        })
        .collect())
}
