//! Tree pruning ahead of extraction.
//!
//! Every operation returns a pruned copy of the document. The input is never
//! mutated, so a parsed page can be inspected again after sanitizing.

use lesekorpus_core::{ContainerRule, Error, Marker, SanitizeRule};
use scraper::{ElementRef, Html};

use super::dom::{child_elements, find_container, has_class, matches_marker};

/// Remove every `tag` element (carrying `class`, when given) and its subtree.
///
/// A no-op copy when nothing matches.
pub fn remove_by_tag_and_class(doc: &Html, tag: &str, class: Option<&str>) -> Html {
    let mut pruned = doc.clone();
    let ids: Vec<_> = pruned
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag && class.is_none_or(|class| has_class(el, class)))
        .map(|el| el.id())
        .collect();

    if !ids.is_empty() {
        tracing::trace!(tag, class, removed = ids.len(), "pruned subtrees");
    }

    for id in ids {
        if let Some(mut node) = pruned.tree.get_mut(id) {
            node.detach();
        }
    }
    pruned
}

/// Cut the container's children at the first one matching `marker`.
///
/// The marker and every later sibling node are removed; ancestors and earlier
/// siblings are untouched. A no-op copy when the container or marker is absent.
pub fn truncate_after(doc: &Html, container: &ContainerRule, marker: &Marker) -> Result<Html, Error> {
    let mut pruned = doc.clone();

    let ids: Vec<_> = match find_container(&pruned, container)? {
        Some(container) => match child_elements(container).find(|child| matches_marker(child, marker)) {
            Some(cut) => std::iter::once(cut.id()).chain(cut.next_siblings().map(|sibling| sibling.id())).collect(),
            None => Vec::new(),
        },
        None => Vec::new(),
    };

    // node ids index the cloned tree's storage, which mirrors the original
    for id in ids {
        if let Some(mut node) = pruned.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(pruned)
}

/// Apply a site's prune rules, then its truncation marker.
pub fn sanitize(doc: &Html, rule: &SanitizeRule, container: &ContainerRule) -> Result<Html, Error> {
    let mut pruned = doc.clone();
    for prune in &rule.remove {
        pruned = remove_by_tag_and_class(&pruned, &prune.tag, prune.class.as_deref());
    }

    match &rule.truncate_at {
        Some(marker) => truncate_after(&pruned, container, marker),
        None => Ok(pruned),
    }
}
