//! Link harvesting: category listings and "next page" links.

use lesekorpus_core::{Error, ListingRule, NextLinkRule};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

use super::dom::{has_ancestor_with_class, normalized_text, selector};
use crate::fetch::resolve;

/// A harvested link with text and href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Link text content
    pub text: String,
    /// Resolved href URL
    pub href: Url,
}

/// Harvest article links from one category page.
///
/// Only anchors matching the rule's selector whose raw `href` starts with the
/// rule's prefix are kept. Relative URLs are resolved against `base_url` and
/// duplicates (by resolved URL) dropped, first occurrence wins.
pub fn extract_listing_links(doc: &Html, base_url: &Url, rule: &ListingRule) -> Result<Vec<Link>, Error> {
    let anchors = selector(&rule.link_selector)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in doc.root_element().select(&anchors) {
        let Some(href) = element.value().attr("href") else { continue };

        if !href.starts_with(&rule.href_prefix) {
            continue;
        }

        let resolved = match resolve(base_url, href) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(href, error = %e, "skipping unresolvable listing link");
                continue;
            }
        };

        if !seen.insert(resolved.clone()) {
            continue;
        }

        links.push(Link { text: normalized_text(&element), href: resolved });
    }

    Ok(links)
}

/// Find the link to the next page of a chain.
///
/// Candidates are anchors whose visible text contains the rule's keyword,
/// case-insensitively, in document order. Anchors nested inside the excluded
/// region are skipped; the first remaining candidate with a resolvable href wins.
pub fn find_next_link(doc: &Html, base_url: &Url, rule: &NextLinkRule) -> Result<Option<Url>, Error> {
    let anchors = selector("a[href]")?;
    let keyword = rule.keyword.to_lowercase();

    let next = doc
        .root_element()
        .select(&anchors)
        .filter(|a| normalized_text(a).to_lowercase().contains(&keyword))
        .filter(|a| {
            rule.excluded_class
                .as_deref()
                .is_none_or(|class| !has_ancestor_with_class(a, class))
        })
        .find_map(|a| a.value().attr("href").and_then(|href| resolve(base_url, href).ok()));

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_rule() -> ListingRule {
        ListingRule {
            link_selector: "div.mw-category a".into(),
            href_prefix: "/wiki/".into(),
            next_link: NextLinkRule::keyword("nächste Seite"),
        }
    }

    fn base() -> Url {
        Url::parse("https://klexikon.zum.de/wiki/Kategorie:Klexikon-Artikel").unwrap()
    }

    #[test]
    fn test_listing_links_prefix_and_resolution() {
        let doc = Html::parse_document(
            r#"<body>
                <div class="mw-category">
                    <a href="/wiki/Aal">Aal</a>
                    <a href="/wiki/B%C3%A4r">Bär</a>
                    <a href="https://example.org/wiki/Fremd">Fremd</a>
                    <a href="/w/index.php?title=Aal">Bearbeiten</a>
                </div>
                <a href="/wiki/Hauptseite">Hauptseite</a>
            </body>"#,
        );

        let links = extract_listing_links(&doc, &base(), &listing_rule()).unwrap();
        let hrefs: Vec<_> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, ["https://klexikon.zum.de/wiki/Aal", "https://klexikon.zum.de/wiki/B%C3%A4r"]);
        assert_eq!(links[1].text, "Bär");
    }

    #[test]
    fn test_listing_links_duplicate() {
        let doc = Html::parse_document(
            r#"<div class="mw-category"><a href="/wiki/Aal">Erster</a><a href="/wiki/Aal">Zweiter</a></div>"#,
        );
        let links = extract_listing_links(&doc, &base(), &listing_rule()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "Erster");
    }

    #[test]
    fn test_listing_links_none() {
        let doc = Html::parse_document("<body><p>Leer</p></body>");
        assert!(extract_listing_links(&doc, &base(), &listing_rule()).unwrap().is_empty());
    }

    #[test]
    fn test_next_link_keyword_case_insensitive() {
        let doc = Html::parse_document(
            r#"<body><a href="chap001.html">zurück</a> <a href="chap003.html">WEITER &gt;&gt;</a></body>"#,
        );
        let page = Url::parse("https://www.projekt-gutenberg.org/spyri/heidi/chap002.html").unwrap();
        let rule = NextLinkRule::keyword("weiter");

        let next = find_next_link(&doc, &page, &rule).unwrap();
        assert_eq!(next.unwrap().as_str(), "https://www.projekt-gutenberg.org/spyri/heidi/chap003.html");
    }

    #[test]
    fn test_next_link_skips_excluded_region() {
        let doc = Html::parse_document(
            r#"<body>
                <div class="dropdown"><ul><li><a href="/autoren/weiter.html">Weitere Autoren</a></li></ul></div>
                <a href="chap002.html">weiter &gt;&gt;</a>
            </body>"#,
        );
        let page = Url::parse("https://www.projekt-gutenberg.org/spyri/heidi/chap001.html").unwrap();
        let rule = NextLinkRule { keyword: "weiter".into(), excluded_class: Some("dropdown".into()) };

        let next = find_next_link(&doc, &page, &rule).unwrap();
        assert_eq!(next.unwrap().as_str(), "https://www.projekt-gutenberg.org/spyri/heidi/chap002.html");
    }

    #[test]
    fn test_next_link_first_match_wins() {
        let doc = Html::parse_document(
            r#"<body><a href="/seite2">nächste Seite</a><a href="/seite9">nächste Seite</a></body>"#,
        );
        let next = find_next_link(&doc, &base(), &NextLinkRule::keyword("nächste Seite")).unwrap();
        assert_eq!(next.unwrap().as_str(), "https://klexikon.zum.de/seite2");
    }

    #[test]
    fn test_next_link_absent() {
        let doc = Html::parse_document(r#"<body><a href="/x">vorherige Seite</a></body>"#);
        let next = find_next_link(&doc, &base(), &NextLinkRule::keyword("nächste Seite")).unwrap();
        assert!(next.is_none());
    }
}
