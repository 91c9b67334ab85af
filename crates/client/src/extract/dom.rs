//! Small helpers over scraper's element tree shared by the extractors.

use lesekorpus_core::{ContainerRule, Error, Marker};
use scraper::{ElementRef, Html, Node, Selector};

/// Parse a CSS selector, reporting failures as profile errors.
pub fn selector(css: &str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::InvalidSelector(format!("{css}: {e}")))
}

pub fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn matches_marker(element: &ElementRef, marker: &Marker) -> bool {
    match marker {
        Marker::Class(class) => has_class(element, class),
        Marker::Tag(tag) => element.value().name() == tag,
    }
}

pub fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

pub fn is_list(name: &str) -> bool {
    matches!(name, "ol" | "ul")
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text below an element, whitespace-normalized.
///
/// A `<br>` counts as whitespace, so verse lines never run together. Inline
/// elements add nothing, which keeps `Honig</a>.` as `Honig.`.
pub fn normalized_text(element: &ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if el.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&text)
}

/// Direct child elements, skipping text and comment nodes.
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

/// The next sibling that is an element.
pub fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Whether any ancestor element carries `class`.
pub fn has_ancestor_with_class(element: &ElementRef, class: &str) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(|ancestor| has_class(&ancestor, class))
}

/// Text of the document's `<title>`, if any.
pub fn page_title(doc: &Html) -> Option<String> {
    let title = selector("title").ok()?;
    doc.root_element()
        .select(&title)
        .next()
        .map(|el| normalized_text(&el))
        .filter(|t| !t.is_empty())
}

/// Locate the main content container.
///
/// Selection always walks from the root element, so subtrees detached by the
/// sanitizer are never considered. Returns `Ok(None)` when nothing matches.
pub fn find_container<'a>(doc: &'a Html, rule: &ContainerRule) -> Result<Option<ElementRef<'a>>, Error> {
    let root = doc.root_element();

    match rule {
        ContainerRule::Select { candidate, wrapper } => {
            let candidates: Vec<_> = root.select(&selector(candidate)?).collect();

            if candidates.len() > 1
                && let Some(wrapper) = wrapper
            {
                let wrapper = selector(wrapper)?;
                let nested = candidates.iter().find(|candidate| {
                    candidate.ancestors().filter_map(ElementRef::wrap).any(|ancestor| wrapper.matches(&ancestor))
                });
                if let Some(nested) = nested {
                    return Ok(Some(*nested));
                }
            }

            Ok(candidates.into_iter().next())
        }
        ContainerRule::ParentOfFirst(tag) => Ok(root
            .select(&selector(tag)?)
            .next()
            .and_then(|marker| marker.parent())
            .and_then(ElementRef::wrap)),
    }
}
