//! Per-site constants for the shared crawl primitives.
//!
//! Each site family is described by one [`SiteProfile`] value. The sanitizer,
//! extractor, pagination walker and TOC parser only ever see these values, so
//! supporting another site means writing another constructor here.

/// Element predicate used for truncation, stop markers and start markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Element carries this CSS class.
    Class(String),
    /// Element has this tag name (e.g. `hr`).
    Tag(String),
}

impl Marker {
    pub fn class(name: &str) -> Self {
        Marker::Class(name.to_string())
    }

    pub fn tag(name: &str) -> Self {
        Marker::Tag(name.to_string())
    }
}

/// How the main content container is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRule {
    /// Elements matching `candidate`; with several matches, the first one nested
    /// inside `wrapper` wins, otherwise the first match.
    Select { candidate: String, wrapper: Option<String> },
    /// The parent of the first element with this tag.
    ParentOfFirst(String),
}

impl ContainerRule {
    pub fn select(candidate: &str) -> Self {
        ContainerRule::Select { candidate: candidate.to_string(), wrapper: None }
    }

    pub fn select_within(candidate: &str, wrapper: &str) -> Self {
        ContainerRule::Select { candidate: candidate.to_string(), wrapper: Some(wrapper.to_string()) }
    }
}

/// Which elements below the container are collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Direct children only.
    #[default]
    Children,
    /// Every heading and paragraph at any depth, in document order.
    Descendants,
}

/// Subtrees removed wholesale before extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneRule {
    pub tag: String,
    /// `None` removes every element with `tag`.
    pub class: Option<String>,
}

impl PruneRule {
    pub fn tag(tag: &str) -> Self {
        Self { tag: tag.to_string(), class: None }
    }

    pub fn tag_and_class(tag: &str, class: &str) -> Self {
        Self { tag: tag.to_string(), class: Some(class.to_string()) }
    }
}

/// Pruning applied to every fetched page of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeRule {
    pub remove: Vec<PruneRule>,
    /// Marker among the container's children at which the rest is cut off.
    pub truncate_at: Option<Marker>,
}

/// Content extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRule {
    pub container: ContainerRule,
    /// Collection begins after the first child matching this marker.
    pub start_after: Option<Marker>,
    /// Collection ends before the first child matching this marker.
    pub stop_at: Option<Marker>,
    pub scope: Scope,
}

impl ExtractRule {
    pub fn new(container: ContainerRule) -> Self {
        Self { container, start_after: None, stop_at: None, scope: Scope::Children }
    }
}

/// Finds the link to the following page of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextLinkRule {
    /// Case-insensitive substring of the link text.
    pub keyword: String,
    /// Links nested inside an element with this class are never followed.
    pub excluded_class: Option<String>,
}

impl NextLinkRule {
    pub fn keyword(keyword: &str) -> Self {
        Self { keyword: keyword.to_string(), excluded_class: None }
    }
}

/// Harvests article links from paginated category pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRule {
    pub link_selector: String,
    /// Only hrefs starting with this prefix are kept.
    pub href_prefix: String,
    pub next_link: NextLinkRule,
}

/// Harvests book entries from a reading-list page grouped under headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRule {
    pub heading_tag: String,
    /// Anchor ids of the category headings to keep.
    pub category_ids: Vec<String>,
}

/// Parses chapter headings and their link lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocRule {
    pub container: ContainerRule,
    /// Class of the element some wikis wrap headings in.
    pub heading_wrapper_class: Option<String>,
    /// Chapters with exactly this title are dropped.
    pub sentinel_title: Option<String>,
}

/// The navigation shape a seed URL starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    CategoryListing,
    BookIndex,
    TableOfContents,
    PrintVersion,
}

/// A starting URL and its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: String,
    pub layout: Layout,
}

impl Seed {
    pub fn new(url: &str, layout: Layout) -> Self {
        Self { url: url.to_string(), layout }
    }
}

/// Site families with a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Klexikon,
    MiniKlexikon,
    Gutenberg,
    Wikijunior,
}

impl Family {
    pub fn profile(self) -> SiteProfile {
        match self {
            Family::Klexikon => SiteProfile::klexikon(),
            Family::MiniKlexikon => SiteProfile::miniklexikon(),
            Family::Gutenberg => SiteProfile::gutenberg(),
            Family::Wikijunior => SiteProfile::wikijunior(),
        }
    }
}

/// Everything the shared primitives need to know about one site family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub name: String,
    pub seeds: Vec<Seed>,
    pub sanitize: SanitizeRule,
    pub extract: ExtractRule,
    /// Chains the pages of one document (books).
    pub next_link: Option<NextLinkRule>,
    pub listing: Option<ListingRule>,
    pub index: Option<IndexRule>,
    pub toc: Option<TocRule>,
    /// Decode pages as UTF-8 whatever charset the server declares.
    pub force_utf8: bool,
    pub output_file: String,
}

const MEDIAWIKI_PARSER_OUTPUT: &str = "div.mw-parser-output";
const MEDIAWIKI_CONTENT_TEXT: &str = "div#mw-content-text";
const NEXT_CATEGORY_PAGE: &str = "nächste Seite";

impl SiteProfile {
    fn wiki_listing() -> ListingRule {
        ListingRule {
            link_selector: "div.mw-category a".into(),
            href_prefix: "/wiki/".into(),
            next_link: NextLinkRule::keyword(NEXT_CATEGORY_PAGE),
        }
    }

    /// Klexikon: articles end where the search box starts.
    pub fn klexikon() -> Self {
        Self {
            name: "klexikon".into(),
            seeds: vec![Seed::new("https://klexikon.zum.de/wiki/Kategorie:Klexikon-Artikel", Layout::CategoryListing)],
            sanitize: SanitizeRule {
                remove: vec![PruneRule::tag_and_class("div", "klexibox")],
                truncate_at: Some(Marker::class("mw-inputbox-centered")),
            },
            extract: ExtractRule::new(ContainerRule::select_within(MEDIAWIKI_PARSER_OUTPUT, MEDIAWIKI_CONTENT_TEXT)),
            next_link: None,
            listing: Some(Self::wiki_listing()),
            index: None,
            toc: None,
            force_utf8: false,
            output_file: "klexikon_dataset.json".into(),
        }
    }

    /// MiniKlexikon: articles end at the first horizontal rule.
    pub fn miniklexikon() -> Self {
        Self {
            name: "miniklexikon".into(),
            seeds: vec![Seed::new("https://miniklexikon.zum.de/wiki/Kategorie:Alle_Artikel", Layout::CategoryListing)],
            sanitize: SanitizeRule {
                remove: vec![PruneRule::tag_and_class("div", "klexibox")],
                truncate_at: Some(Marker::tag("hr")),
            },
            extract: ExtractRule::new(ContainerRule::select_within(MEDIAWIKI_PARSER_OUTPUT, MEDIAWIKI_CONTENT_TEXT)),
            next_link: None,
            listing: Some(Self::wiki_listing()),
            index: None,
            toc: None,
            force_utf8: false,
            output_file: "miniklexikon_dataset.json".into(),
        }
    }

    /// Projekt Gutenberg: book text sits between two rules, chained by "weiter" links.
    pub fn gutenberg() -> Self {
        Self {
            name: "gutenberg".into(),
            seeds: vec![Seed::new("https://www.projekt-gutenberg.org/info/texte/lesetips.html", Layout::BookIndex)],
            sanitize: SanitizeRule { remove: vec![PruneRule::tag_and_class("div", "anzeige-chap")], truncate_at: None },
            extract: ExtractRule {
                container: ContainerRule::ParentOfFirst("hr".into()),
                start_after: Some(Marker::tag("hr")),
                stop_at: Some(Marker::tag("hr")),
                scope: Scope::Children,
            },
            next_link: Some(NextLinkRule { keyword: "weiter".into(), excluded_class: Some("dropdown".into()) }),
            listing: None,
            index: Some(IndexRule {
                heading_tag: "h4".into(),
                category_ids: vec!["ab-12Jahren".into(), "bis-11-Jahre".into()],
            }),
            toc: None,
            force_utf8: true,
            output_file: "gutenberg_dataset.json".into(),
        }
    }

    /// Wikijunior: books are either a TOC page linking chapter pages or a single print version.
    pub fn wikijunior() -> Self {
        let print = |slug: &str| Seed::new(&format!("https://de.wikibooks.org/wiki/{slug}/_Druckversion"), Layout::PrintVersion);

        Self {
            name: "wikijunior".into(),
            seeds: vec![
                Seed::new("https://de.wikibooks.org/wiki/Wikijunior_Computer_und_Internet", Layout::TableOfContents),
                print("Wikijunior_Sonnensystem"),
                print("Wikijunior_Die_Elemente"),
                print("Wikijunior_Entwicklung_des_Lebens"),
                print("Wikijunior_Sprachen"),
                print("Wikijunior_Europa"),
                print("Wikijunior_Gro%C3%9Fkatzen"),
            ],
            sanitize: SanitizeRule { remove: vec![PruneRule::tag("table")], truncate_at: None },
            extract: ExtractRule {
                container: ContainerRule::select(MEDIAWIKI_CONTENT_TEXT),
                start_after: None,
                stop_at: None,
                scope: Scope::Descendants,
            },
            next_link: None,
            listing: None,
            index: None,
            toc: Some(TocRule {
                container: ContainerRule::select(MEDIAWIKI_CONTENT_TEXT),
                heading_wrapper_class: Some("mw-heading".into()),
                sentinel_title: Some("Zusammenfassung des Projekts".into()),
            }),
            force_utf8: false,
            output_file: "wikijunior_dataset.json".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_profiles_have_seeds_and_outputs() {
        for family in [Family::Klexikon, Family::MiniKlexikon, Family::Gutenberg, Family::Wikijunior] {
            let profile = family.profile();
            assert!(!profile.seeds.is_empty(), "{} has no seeds", profile.name);
            assert!(profile.output_file.ends_with("_dataset.json"));
        }
    }

    #[test]
    fn test_klexikon_and_miniklexikon_differ_only_in_truncation() {
        let full = SiteProfile::klexikon();
        let mini = SiteProfile::miniklexikon();
        assert_eq!(full.extract, mini.extract);
        assert_eq!(full.listing, mini.listing);
        assert_eq!(full.sanitize.truncate_at, Some(Marker::class("mw-inputbox-centered")));
        assert_eq!(mini.sanitize.truncate_at, Some(Marker::tag("hr")));
    }

    #[test]
    fn test_only_gutenberg_forces_utf8() {
        assert!(SiteProfile::gutenberg().force_utf8);
        assert!(!SiteProfile::klexikon().force_utf8);
        assert!(!SiteProfile::wikijunior().force_utf8);
    }

    #[test]
    fn test_wikijunior_seed_layouts() {
        let profile = SiteProfile::wikijunior();
        assert_eq!(profile.seeds[0].layout, Layout::TableOfContents);
        assert!(profile.seeds[1..].iter().all(|s| s.layout == Layout::PrintVersion));
        assert!(profile.seeds[1].url.ends_with("/_Druckversion"));
    }
}
