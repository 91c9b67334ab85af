//! Table-of-contents parsing.
//!
//! A TOC page is a sequence of headings, each immediately followed by a list
//! of chapter links. Lists nest for sub-chapters, and wikis often repeat the
//! parent page as an in-page anchor (`Kapitel#Abschnitt`) inside the nested
//! list; those self-links are dropped.

use lesekorpus_core::{Chapter, Error, TocNode, TocRule};
use scraper::{ElementRef, Html};
use url::Url;

use super::dom::{child_elements, find_container, has_class, is_heading, is_list, next_element_sibling, normalized_text};
use crate::fetch::{resolve, same_document};

/// Whether `a` belongs to `item` itself rather than to a list nested in it.
fn owned_by_item(a: &ElementRef, item: &ElementRef) -> bool {
    a.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|ancestor| ancestor.id() != item.id())
        .all(|ancestor| !is_list(ancestor.value().name()))
}

/// The item's first anchor that does not wrap an image.
fn item_anchor<'a>(item: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    item.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter(|a| owned_by_item(a, item))
        .find(|a| !a.descendants().filter_map(ElementRef::wrap).any(|el| el.value().name() == "img"))
}

/// The first list nested anywhere inside the item.
fn nested_list<'a>(item: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    item.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| is_list(el.value().name()))
}

/// Parse an `ol`/`ul` element into TOC nodes.
///
/// Items whose link resolves to the same document as `parent` (fragments
/// ignored) are skipped. Nested lists are parsed with the item's URL as the
/// new parent and attached as children when non-empty.
pub fn parse_toc_list(list: ElementRef, base_url: &Url, parent: Option<&Url>) -> Vec<TocNode> {
    let mut nodes = Vec::new();

    for item in child_elements(list).filter(|el| el.value().name() == "li") {
        let Some(anchor) = item_anchor(&item) else { continue };

        let Some(href) = anchor.value().attr("href") else { continue };
        let url = match resolve(base_url, href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href, error = %e, "skipping unresolvable TOC link");
                continue;
            }
        };

        if parent.is_some_and(|parent| same_document(&url, parent)) {
            continue;
        }

        let children = nested_list(&item)
            .map(|nested| parse_toc_list(nested, base_url, Some(&url)))
            .unwrap_or_default();

        nodes.push(TocNode { title: normalized_text(&anchor), url: url.to_string(), children });
    }

    nodes
}

/// The heading title of a chapter candidate: a bare `h1`-`h6`, or the first
/// heading inside a heading wrapper.
fn heading_title(element: &ElementRef, wrapper_class: Option<&str>) -> Option<String> {
    let name = element.value().name();

    if wrapper_class.is_some_and(|class| has_class(element, class)) {
        let heading = element.descendants().filter_map(ElementRef::wrap).find(|el| is_heading(el.value().name()))?;
        return Some(normalized_text(&heading));
    }

    if !is_heading(name) {
        return None;
    }

    // headings inside a wrapper are handled through the wrapper
    let wrapped = element
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| wrapper_class.is_some_and(|class| has_class(&parent, class)));
    if wrapped { None } else { Some(normalized_text(element)) }
}

/// Parse the chapters of a TOC page.
///
/// A chapter is a heading (or heading wrapper) whose next element sibling is
/// a list. Chapters titled exactly like the rule's sentinel are dropped.
pub fn parse_chapters(doc: &Html, base_url: &Url, rule: &TocRule) -> Result<Vec<Chapter>, Error> {
    let Some(container) = find_container(doc, &rule.container)? else {
        tracing::debug!(url = %base_url, "TOC container not found");
        return Ok(Vec::new());
    };

    let wrapper_class = rule.heading_wrapper_class.as_deref();
    let mut chapters = Vec::new();

    for element in container.descendants().skip(1).filter_map(ElementRef::wrap) {
        let Some(title) = heading_title(&element, wrapper_class) else { continue };

        let Some(list) = next_element_sibling(element).filter(|el| is_list(el.value().name())) else { continue };

        if rule.sentinel_title.as_deref() == Some(title.as_str()) {
            tracing::debug!(title, "skipping sentinel chapter");
            continue;
        }

        chapters.push(Chapter { title, links: parse_toc_list(list, base_url, None) });
    }

    Ok(chapters)
}
