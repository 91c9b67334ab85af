//! Klexikon and MiniKlexikon: a paginated category listing of articles.

use async_trait::async_trait;
use lesekorpus_core::{Article, Error, Layout, SiteProfile, WikiRecord};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use super::CrawlContext;
use crate::crawl::{PaginationWalker, WorkItem};
use crate::extract::{Extractor, ProfileExtractor, extract_listing_links};
use crate::fetch::{PageSource, parse_absolute};

/// One article page: fetch, sanitize, extract, segment.
pub struct ArticleUnit {
    url: Url,
    extractor: Arc<ProfileExtractor>,
    force_utf8: bool,
}

impl ArticleUnit {
    pub fn new(url: Url, extractor: Arc<ProfileExtractor>, force_utf8: bool) -> Self {
        Self { url, extractor, force_utf8 }
    }
}

#[async_trait]
impl WorkItem for ArticleUnit {
    type Output = Article;

    async fn process(&self, source: &dyn PageSource) -> Article {
        let html = match source.fetch_html(&self.url, self.force_utf8).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "article fetch failed");
                return self.degraded();
            }
        };

        self.extractor.article(&html, &self.url).unwrap_or_else(|e| {
            tracing::warn!(url = %self.url, error = %e, "article extraction failed");
            self.degraded()
        })
    }

    fn degraded(&self) -> Article {
        Article { url: self.url.to_string(), ..Default::default() }
    }

    fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Walk every category listing seed and collect article URLs.
///
/// URLs keep listing order; an article listed twice is crawled once.
pub async fn collect_article_urls(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Vec<Url>, Error> {
    let listing = profile
        .listing
        .as_ref()
        .ok_or_else(|| Error::InvalidProfile(format!("{} has no listing rule", profile.name)))?;

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for seed in profile.seeds.iter().filter(|seed| seed.layout == Layout::CategoryListing) {
        let start = parse_absolute(&seed.url)?;
        let walker = PaginationWalker::new(ctx.source.as_ref(), listing.next_link.clone())
            .force_utf8(profile.force_utf8)
            .max_pages(ctx.max_pages);

        let walk = walker.walk(start, |doc, page| extract_listing_links(doc, page, listing)).await;
        tracing::info!(
            seed = %seed.url,
            pages = walk.pages,
            links = walk.items.len(),
            outcome = ?walk.outcome,
            "category listing walked"
        );

        urls.extend(walk.items.into_iter().map(|link| link.href).filter(|href| seen.insert(href.clone())));
    }

    Ok(urls)
}

/// Crawl all articles of a wiki family into records numbered from 1.
pub async fn crawl_wiki(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Vec<WikiRecord>, Error> {
    let urls = collect_article_urls(profile, ctx).await?;
    let extractor = Arc::new(ProfileExtractor::new(profile));

    let units: Vec<_> = urls
        .into_iter()
        .map(|url| ArticleUnit::new(url, Arc::clone(&extractor), profile.force_utf8))
        .collect();

    let results = ctx.scheduler(units.len(), "Artikel").run(units).await;

    Ok(results
        .into_iter()
        .map(|done| {
            let paragraphs = done.output.paragraphs();
            WikiRecord { id: done.id, wiki_link: done.output.url, paragraphs, sentences: done.output.sentences }
        })
        .collect())
}
