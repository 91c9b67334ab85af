//! Wikijunior: books on Wikibooks, either a TOC page or a single print version.

use async_trait::async_trait;
use lesekorpus_core::{Chapter, Error, Layout, SiteProfile, TocRecord, TocRule};
use scraper::Html;
use std::sync::Arc;
use url::Url;

use super::CrawlContext;
use crate::crawl::WorkItem;
use crate::extract::{Extractor, ProfileExtractor, group_sections, page_title, parse_chapters};
use crate::fetch::{PageSource, parse_absolute};

/// Book title used when a page has no `<title>`.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One chapter page linked from a TOC.
pub struct TocLeafUnit {
    book_title: String,
    chapter: String,
    link_text: String,
    url: String,
    extractor: Arc<ProfileExtractor>,
    force_utf8: bool,
}

#[async_trait]
impl WorkItem for TocLeafUnit {
    type Output = TocRecord;

    async fn process(&self, source: &dyn PageSource) -> TocRecord {
        let url = match parse_absolute(&self.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "invalid chapter link");
                return self.degraded();
            }
        };

        let html = match source.fetch_html(&url, self.force_utf8).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "chapter fetch failed");
                return self.degraded();
            }
        };

        match self.extractor.article(&html, &url) {
            Ok(article) => TocRecord { paragraphs: article.paragraphs(), ..self.degraded() },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "chapter extraction failed");
                self.degraded()
            }
        }
    }

    fn degraded(&self) -> TocRecord {
        TocRecord {
            book_title: self.book_title.clone(),
            chapter: self.chapter.clone(),
            link_text: self.link_text.clone(),
            wiki_link: self.url.clone(),
            paragraphs: Vec::new(),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

fn title_or_unknown(doc: &Html) -> String {
    page_title(doc).unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Book title and chapters of a TOC page.
fn toc_outline(html: &str, url: &Url, rule: &TocRule) -> Result<(String, Vec<Chapter>), Error> {
    let doc = Html::parse_document(html);
    Ok((title_or_unknown(&doc), parse_chapters(&doc, url, rule)?))
}

/// Records of a print version: one per section, linking back to the page.
fn print_records(html: &str, url: &Url, extractor: &ProfileExtractor) -> Result<Vec<TocRecord>, Error> {
    let doc = Html::parse_document(html);
    let book_title = title_or_unknown(&doc);
    let sections = group_sections(&extractor.blocks(&doc)?);

    Ok(sections
        .into_iter()
        .map(|section| TocRecord {
            book_title: book_title.clone(),
            chapter: section.headline.clone(),
            link_text: section.headline,
            wiki_link: url.to_string(),
            paragraphs: section.paragraphs,
        })
        .collect())
}

/// Fetch a TOC page and crawl every node of every chapter.
async fn crawl_toc(url: &Url, rule: &TocRule, extractor: &Arc<ProfileExtractor>, force_utf8: bool, ctx: &CrawlContext) -> Vec<TocRecord> {
    let html = match ctx.source.fetch_html(url, force_utf8).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "TOC fetch failed");
            return Vec::new();
        }
    };

    let (book_title, chapters) = match toc_outline(&html, url, rule) {
        Ok(outline) => outline,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "TOC parsing failed");
            return Vec::new();
        }
    };

    let mut units = Vec::new();
    for chapter in &chapters {
        units.extend(chapter.flatten().into_iter().map(|node| TocLeafUnit {
            book_title: book_title.clone(),
            chapter: chapter.title.clone(),
            link_text: node.title.clone(),
            url: node.url.clone(),
            extractor: Arc::clone(extractor),
            force_utf8,
        }));
    }

    tracing::info!(book = %book_title, chapters = chapters.len(), pages = units.len(), "TOC parsed");

    ctx.scheduler(units.len(), "Kapitel")
        .run(units)
        .await
        .into_iter()
        .map(|done| done.output)
        .collect()
}

async fn crawl_print(url: &Url, extractor: &ProfileExtractor, force_utf8: bool, ctx: &CrawlContext) -> Vec<TocRecord> {
    let html = match ctx.source.fetch_html(url, force_utf8).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "print version fetch failed");
            return Vec::new();
        }
    };

    print_records(&html, url, extractor).unwrap_or_else(|e| {
        tracing::warn!(url = %url, error = %e, "print version extraction failed");
        Vec::new()
    })
}

/// Crawl the profile's book pages in seed order, at most `max_pages` of them.
pub async fn crawl_wikijunior(profile: &SiteProfile, ctx: &CrawlContext) -> Result<Vec<TocRecord>, Error> {
    let extractor = Arc::new(ProfileExtractor::new(profile));
    let limit = ctx.max_pages.unwrap_or(usize::MAX);
    let mut records = Vec::new();

    for seed in profile.seeds.iter().take(limit) {
        let url = parse_absolute(&seed.url)?;

        let found = match seed.layout {
            Layout::TableOfContents => {
                let rule = profile
                    .toc
                    .as_ref()
                    .ok_or_else(|| Error::InvalidProfile(format!("{} has no TOC rule", profile.name)))?;
                crawl_toc(&url, rule, &extractor, profile.force_utf8, ctx).await
            }
            Layout::PrintVersion => crawl_print(&url, &extractor, profile.force_utf8, ctx).await,
            Layout::CategoryListing | Layout::BookIndex => {
                tracing::warn!(url = %url, layout = ?seed.layout, "skipping seed with unsupported layout");
                Vec::new()
            }
        };

        tracing::debug!(url = %url, records = found.len(), "book page crawled");
        records.extend(found);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::testing::MemorySite;
    use lesekorpus_core::Seed;

    const TOC: &str = r#"<html><head><title>Wikijunior Computer und Internet – Wikibooks</title></head><body>
        <div id="mw-content-text"><div class="mw-parser-output">
            <div class="mw-heading mw-heading2"><h2>Hardware</h2></div>
            <ol>
                <li><a href="/wiki/WJ/_Computer">Der Computer</a>
                    <ul>
                        <li><a href="/wiki/WJ/_Computer#Geschichte">Geschichte</a></li>
                        <li><a href="/wiki/WJ/_Maus">Die Maus</a></li>
                    </ul>
                </li>
            </ol>
            <div class="mw-heading mw-heading2"><h2>Zusammenfassung des Projekts</h2></div>
            <ul><li><a href="/wiki/WJ/_Status">Status</a></li></ul>
        </div></div>
    </body></html>"#;

    const COMPUTER: &str = r#"<html><body><div id="mw-content-text"><div class="mw-parser-output">
        <div class="mw-heading mw-heading2"><h2>Was ist ein Computer?</h2></div>
        <table><tr><td><p>Tabelle.</p></td></tr></table>
        <p>Ein Computer rechnet.</p>
    </div></div></body></html>"#;

    const PRINT: &str = r#"<html><head><title>Wikijunior Europa/ Druckversion – Wikibooks</title></head><body>
        <div id="mw-content-text"><div class="mw-parser-output">
            <p>Willkommen.</p>
            <div class="mw-heading mw-heading2"><h2>Länder</h2></div>
            <p>Europa hat viele Länder.</p>
            <table><tr><td><p>Fläche</p></td></tr></table>
            <div class="mw-heading mw-heading2"><h2>Flüsse</h2></div>
            <div><p>Der Rhein ist lang.</p></div>
        </div></div>
    </body></html>"#;

    const TOC_URL: &str = "https://de.wikibooks.org/wiki/Wikijunior_Computer_und_Internet";
    const PRINT_URL: &str = "https://de.wikibooks.org/wiki/Wikijunior_Europa/_Druckversion";

    fn profile() -> SiteProfile {
        SiteProfile {
            seeds: vec![Seed::new(TOC_URL, Layout::TableOfContents), Seed::new(PRINT_URL, Layout::PrintVersion)],
            ..SiteProfile::wikijunior()
        }
    }

    fn site() -> MemorySite {
        MemorySite::default()
            .page(TOC_URL, TOC)
            .page("https://de.wikibooks.org/wiki/WJ/_Computer", COMPUTER)
            .page(PRINT_URL, PRINT)
    }

    #[tokio::test]
    async fn test_crawl_wikijunior_toc_and_print() {
        let ctx = CrawlContext::new(Arc::new(site()));
        let records = crawl_wikijunior(&profile(), &ctx).await.unwrap();

        let links: Vec<_> = records.iter().map(|r| (r.chapter.as_str(), r.link_text.as_str())).collect();
        assert_eq!(links, [
            ("Hardware", "Der Computer"),
            ("Hardware", "Die Maus"),
            ("Introduction", "Introduction"),
            ("Länder", "Länder"),
            ("Flüsse", "Flüsse"),
        ]);

        let computer = &records[0];
        assert_eq!(computer.book_title, "Wikijunior Computer und Internet – Wikibooks");
        assert_eq!(computer.wiki_link, "https://de.wikibooks.org/wiki/WJ/_Computer");
        assert_eq!(computer.paragraphs, ["Was ist ein Computer?", "Ein Computer rechnet."]);

        // unreachable chapter page keeps its record with no paragraphs
        assert!(records[1].paragraphs.is_empty());

        let print = &records[2..];
        assert!(print.iter().all(|r| r.wiki_link == PRINT_URL));
        assert!(print.iter().all(|r| r.book_title == "Wikijunior Europa/ Druckversion – Wikibooks"));
        assert_eq!(print[0].paragraphs, ["Willkommen."]);
        assert_eq!(print[1].paragraphs, ["Europa hat viele Länder."]);
        assert_eq!(print[2].paragraphs, ["Der Rhein ist lang."]);
    }

    #[tokio::test]
    async fn test_max_pages_limits_book_pages() {
        let source = Arc::new(site());
        let ctx = CrawlContext::new(source.clone()).with_max_pages(Some(1));
        let records = crawl_wikijunior(&profile(), &ctx).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(!source.requests().contains(&PRINT_URL.to_string()));
    }

    #[tokio::test]
    async fn test_missing_title_is_unknown() {
        let site = MemorySite::default().page(PRINT_URL, "<html><body><div id='mw-content-text'><p>Text.</p></div></body></html>");
        let profile = SiteProfile { seeds: vec![Seed::new(PRINT_URL, Layout::PrintVersion)], ..SiteProfile::wikijunior() };

        let records = crawl_wikijunior(&profile, &CrawlContext::new(Arc::new(site))).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].book_title, UNKNOWN_TITLE);
    }

    #[tokio::test]
    async fn test_unreachable_toc_yields_nothing() {
        let ctx = CrawlContext::new(Arc::new(MemorySite::default()));
        let profile = SiteProfile { seeds: vec![Seed::new(TOC_URL, Layout::TableOfContents)], ..SiteProfile::wikijunior() };
        assert!(crawl_wikijunior(&profile, &ctx).await.unwrap().is_empty());
    }
}
