//! Rule-driven content extraction.
//!
//! ### Pipeline
//! - Sanitize a pruned copy of the page (remove boxes, truncate trailers).
//! - Collect headings and paragraphs from the site's content container.
//! - Segment the collected text into sentences.
//!
//! ### Stable Abstraction
//! - Site crawls talk to the `Extractor` trait, so a family only differs in
//!   the rules its [`SiteProfile`] carries.
//!
//! Extraction is synchronous: parse and extract happen between fetches and
//! a parsed [`Html`] never crosses an await point.

pub mod content;
pub mod dom;
pub mod index;
pub mod links;
pub mod sanitize;
pub mod sentences;
pub mod toc;

pub use content::{INTRODUCTION, extract_blocks, group_sections, join_blocks};
pub use dom::page_title;
pub use index::parse_book_index;
pub use links::{Link, extract_listing_links, find_next_link};
pub use sanitize::{remove_by_tag_and_class, sanitize, truncate_after};
pub use sentences::{split_all, split_sentences};
pub use toc::{parse_chapters, parse_toc_list};

use lesekorpus_core::{Article, ContentBlock, Error, ExtractRule, SanitizeRule, SiteProfile};
use scraper::Html;
use url::Url;

/// Stable extractor trait for page content.
pub trait Extractor: Send + Sync {
    /// Ordered content blocks of an already parsed page.
    fn blocks(&self, doc: &Html) -> Result<Vec<ContentBlock>, Error>;

    /// Parse, extract and segment a single-page document.
    fn article(&self, html: &str, url: &Url) -> Result<Article, Error> {
        let doc = Html::parse_document(html);
        let blocks = self.blocks(&doc)?;
        let sentences = split_all(blocks.iter().map(|b| b.text.as_str()));

        Ok(Article { url: url.to_string(), blocks, sentences })
    }
}

/// Extractor configured from a site profile's sanitize and extract rules.
#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    sanitize: SanitizeRule,
    extract: ExtractRule,
}

impl ProfileExtractor {
    pub fn new(profile: &SiteProfile) -> Self {
        Self { sanitize: profile.sanitize.clone(), extract: profile.extract.clone() }
    }
}

impl Extractor for ProfileExtractor {
    fn blocks(&self, doc: &Html) -> Result<Vec<ContentBlock>, Error> {
        let pruned = sanitize(doc, &self.sanitize, &self.extract.container)?;
        extract_blocks(&pruned, &self.extract)
    }
}
