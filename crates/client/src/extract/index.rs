//! Book index parsing for the Projekt Gutenberg reading tips page.
//!
//! The page is a flat run of `h4` category headings, each followed by `dl`
//! lists whose `dd` entries link to the first page of a book.

use lesekorpus_core::{BookEntry, Error, IndexRule};
use scraper::{ElementRef, Html};
use url::Url;

use super::dom::{normalized_text, selector};
use crate::fetch::resolve;

/// Id of the anchor inside a category heading, if it is one of the wanted ones.
fn category_id<'a>(heading: &ElementRef<'a>, rule: &IndexRule) -> Option<&'a str> {
    heading
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .find_map(|a| a.value().id())
        .filter(|id| rule.category_ids.iter().any(|wanted| wanted == id))
}

/// Entries of one `dl`, in document order.
fn list_entries(list: ElementRef, base_url: &Url) -> Vec<(String, Url)> {
    let mut entries = Vec::new();

    for dd in list.descendants().filter_map(ElementRef::wrap).filter(|el| el.value().name() == "dd") {
        let Some(anchor) = dd.descendants().filter_map(ElementRef::wrap).find(|el| el.value().name() == "a") else {
            continue;
        };
        let Some(href) = anchor.value().attr("href").filter(|href| !href.is_empty()) else { continue };

        match resolve(base_url, href) {
            Ok(url) => entries.push((normalized_text(&anchor), url)),
            Err(e) => tracing::debug!(href, error = %e, "skipping unresolvable book link"),
        }
    }

    entries
}

/// Harvest book entries under the wanted category headings.
///
/// Entries are collected from `dl` siblings following a heading until the
/// next heading of the same tag. Categories and books keep page order.
pub fn parse_book_index(doc: &Html, base_url: &Url, rule: &IndexRule) -> Result<Vec<BookEntry>, Error> {
    let headings = selector(&rule.heading_tag)?;
    let mut books = Vec::new();

    for heading in doc.root_element().select(&headings) {
        let Some(id) = category_id(&heading, rule) else { continue };
        let title = normalized_text(&heading);

        let lists = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|sibling| sibling.value().name() != rule.heading_tag)
            .filter(|sibling| sibling.value().name() == "dl");

        let before = books.len();
        for list in lists {
            books.extend(list_entries(list, base_url).into_iter().map(|(book_title, url)| BookEntry {
                category_id: id.to_string(),
                category_title: title.clone(),
                title: book_title,
                url: url.to_string(),
            }));
        }

        tracing::debug!(category = id, books = books.len() - before, "harvested book category");
    }

    Ok(books)
}
