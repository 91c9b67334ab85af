//! Ordered heading/paragraph extraction from a sanitized document.

use lesekorpus_core::{BlockKind, ContentBlock, Error, ExtractRule, Scope, Section};
use scraper::{ElementRef, Html};

use super::dom::{child_elements, find_container, is_heading, matches_marker, normalized_text};

/// Headline given to paragraphs that precede the first heading of a print version.
pub const INTRODUCTION: &str = "Introduction";

fn block_kind(element: &ElementRef) -> Option<BlockKind> {
    match element.value().name() {
        "p" => Some(BlockKind::Paragraph),
        name if is_heading(name) => Some(BlockKind::Heading),
        _ => None,
    }
}

/// Collect headings and paragraphs from the container in document order.
///
/// A missing container yields no blocks. Collection starts after the
/// `start_after` marker (from the first element when the marker is absent)
/// and ends before the `stop_at` marker.
pub fn extract_blocks(doc: &Html, rule: &ExtractRule) -> Result<Vec<ContentBlock>, Error> {
    let Some(container) = find_container(doc, &rule.container)? else {
        tracing::debug!(container = ?rule.container, "content container not found");
        return Ok(Vec::new());
    };

    let candidates: Vec<ElementRef> = match rule.scope {
        Scope::Children => child_elements(container).collect(),
        Scope::Descendants => container.descendants().skip(1).filter_map(ElementRef::wrap).collect(),
    };

    let start = rule
        .start_after
        .as_ref()
        .and_then(|marker| candidates.iter().position(|el| matches_marker(el, marker)))
        .map_or(0, |index| index + 1);

    let mut blocks = Vec::new();
    for element in &candidates[start..] {
        if let Some(stop) = &rule.stop_at
            && matches_marker(element, stop)
        {
            break;
        }

        let Some(kind) = block_kind(element) else { continue };
        let text = normalized_text(element);
        if text.is_empty() {
            continue;
        }

        blocks.push(ContentBlock { order: blocks.len(), kind, text });
    }

    Ok(blocks)
}

/// Block texts joined into one string, as stored per book page.
pub fn join_blocks(blocks: &[ContentBlock]) -> String {
    blocks.iter().map(|b| b.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Group blocks under their headings.
///
/// Paragraphs before the first heading form an [`INTRODUCTION`] section.
pub fn group_sections(blocks: &[ContentBlock]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for block in blocks {
        match block.kind {
            BlockKind::Heading => sections.push(Section { headline: block.text.clone(), paragraphs: Vec::new() }),
            BlockKind::Paragraph => {
                if sections.is_empty() {
                    sections.push(Section { headline: INTRODUCTION.to_string(), paragraphs: Vec::new() });
                }
                if let Some(current) = sections.last_mut() {
                    current.paragraphs.push(block.text.clone());
                }
            }
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesekorpus_core::{ContainerRule, Marker};

    fn texts(blocks: &[ContentBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    fn wiki_rule() -> ExtractRule {
        ExtractRule::new(ContainerRule::select("div.mw-parser-output"))
    }

    #[test]
    fn test_extract_headings_and_paragraphs_in_order() {
        let doc = Html::parse_document(
            r#"<body><div class="mw-parser-output">
                <h2> Aussehen </h2>
                <p>Bären   sind
                   groß.</p>
                <ul><li>Liste wird ignoriert</li></ul>
                <p>   </p>
                <h3>Nahrung</h3>
                <p>Sie fressen <a href="/wiki/Honig">Honig</a>.</p>
            </div></body>"#,
        );

        let blocks = extract_blocks(&doc, &wiki_rule()).unwrap();
        assert_eq!(texts(&blocks), ["Aussehen", "Bären sind groß.", "Nahrung", "Sie fressen Honig."]);
        assert_eq!(blocks[0].kind, BlockKind::Heading);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks.iter().map(|b| b.order).collect::<Vec<_>>(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_children_scope_skips_nested_paragraphs() {
        let doc = Html::parse_document(
            r#"<body><div class="mw-parser-output"><div class="box"><p>Verschachtelt</p></div><p>Direkt</p></div></body>"#,
        );
        let blocks = extract_blocks(&doc, &wiki_rule()).unwrap();
        assert_eq!(texts(&blocks), ["Direkt"]);
    }

    #[test]
    fn test_stop_marker_class() {
        let doc = Html::parse_document(
            r#"<body><div class="mw-parser-output"><p>Hallo Welt.</p><div class="stop-marker">x</div><p>Nach Marker.</p></div></body>"#,
        );
        let rule = ExtractRule { stop_at: Some(Marker::class("stop-marker")), ..wiki_rule() };

        let blocks = extract_blocks(&doc, &rule).unwrap();
        assert_eq!(texts(&blocks), ["Hallo Welt."]);
    }

    #[test]
    fn test_start_and_stop_between_rules() {
        let doc = Html::parse_document(
            r#"<body>
                <h4>Navigation</h4>
                <hr>
                <h3>Erstes Kapitel</h3>
                <p>Es war einmal.</p>
                <hr>
                <p>Impressum</p>
            </body>"#,
        );
        let rule = ExtractRule {
            container: ContainerRule::ParentOfFirst("hr".into()),
            start_after: Some(Marker::tag("hr")),
            stop_at: Some(Marker::tag("hr")),
            scope: Scope::Children,
        };

        let blocks = extract_blocks(&doc, &rule).unwrap();
        assert_eq!(texts(&blocks), ["Erstes Kapitel", "Es war einmal."]);
    }

    #[test]
    fn test_missing_start_marker_collects_from_first_child() {
        let doc = Html::parse_document(r#"<body><div id="c"><p>Eins</p><p>Zwei</p></div></body>"#);
        let rule = ExtractRule { start_after: Some(Marker::tag("hr")), ..ExtractRule::new(ContainerRule::select("div#c")) };

        let blocks = extract_blocks(&doc, &rule).unwrap();
        assert_eq!(texts(&blocks), ["Eins", "Zwei"]);
    }

    #[test]
    fn test_descendant_scope_finds_wrapped_headings() {
        let doc = Html::parse_document(
            r#"<body><div id="mw-content-text"><div class="mw-parser-output">
                <div class="mw-heading mw-heading2"><h2>Die Maus</h2></div>
                <p>Eine Maus hat Tasten.</p>
                <div><p>Tiefer Absatz.</p></div>
            </div></div></body>"#,
        );
        let rule = ExtractRule { scope: Scope::Descendants, ..ExtractRule::new(ContainerRule::select("div#mw-content-text")) };

        let blocks = extract_blocks(&doc, &rule).unwrap();
        assert_eq!(texts(&blocks), ["Die Maus", "Eine Maus hat Tasten.", "Tiefer Absatz."]);
    }

    #[test]
    fn test_missing_container_is_empty() {
        let doc = Html::parse_document("<body><p>Kein Container</p></body>");
        assert!(extract_blocks(&doc, &wiki_rule()).unwrap().is_empty());
    }

    #[test]
    fn test_join_blocks() {
        let doc = Html::parse_document(r#"<body><div class="mw-parser-output"><h2>Titel</h2><p>Text.</p></div></body>"#);
        let blocks = extract_blocks(&doc, &wiki_rule()).unwrap();
        assert_eq!(join_blocks(&blocks), "Titel Text.");
        assert_eq!(join_blocks(&[]), "");
    }

    #[test]
    fn test_group_sections() {
        let block = |order, kind, text: &str| ContentBlock { order, kind, text: text.to_string() };
        let blocks = vec![
            block(0, BlockKind::Paragraph, "Vorwort."),
            block(1, BlockKind::Heading, "Die Sonne"),
            block(2, BlockKind::Paragraph, "Sie ist heiß."),
            block(3, BlockKind::Paragraph, "Sie ist groß."),
            block(4, BlockKind::Heading, "Der Mond"),
        ];

        let sections = group_sections(&blocks);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].headline, INTRODUCTION);
        assert_eq!(sections[0].paragraphs, ["Vorwort."]);
        assert_eq!(sections[1].headline, "Die Sonne");
        assert_eq!(sections[1].paragraphs, ["Sie ist heiß.", "Sie ist groß."]);
        assert_eq!(sections[2].headline, "Der Mond");
        assert!(sections[2].paragraphs.is_empty());
    }
}
