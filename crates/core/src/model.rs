//! Extraction results and the output records handed to the serializer.

use serde::{Deserialize, Serialize};

/// Kind of a collected content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
}

/// One heading or paragraph, whitespace-normalized and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Position in document order, starting at 0.
    pub order: usize,
    pub kind: BlockKind,
    pub text: String,
}

/// A single-page document and its segmented sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub blocks: Vec<ContentBlock>,
    pub sentences: Vec<String>,
}

impl Article {
    /// Block texts in document order.
    pub fn paragraphs(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.text.clone()).collect()
    }
}

/// One entry of a book index: which category it sits in and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub category_id: String,
    pub category_title: String,
    pub title: String,
    pub url: String,
}

/// A book assembled from a chain of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub category_id: String,
    pub title: String,
    pub url: String,
    /// One string per fetched page.
    pub pages: Vec<String>,
    pub sentences: Vec<String>,
}

/// A node of a table-of-contents tree.
///
/// No node's fragment-stripped `url` equals its parent's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocNode {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocNode>,
}

/// A titled group of TOC links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub links: Vec<TocNode>,
}

impl Chapter {
    /// Every node of the chapter in pre-order, parents before their children.
    pub fn flatten(&self) -> Vec<&TocNode> {
        fn walk<'a>(nodes: &'a [TocNode], out: &mut Vec<&'a TocNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.links, &mut out);
        out
    }
}

/// A headline and the paragraphs below it, from a single-page print version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub headline: String,
    pub paragraphs: Vec<String>,
}

/// Output record for encyclopedia articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WikiRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    pub wiki_link: String,
    pub paragraphs: Vec<String>,
    pub sentences: Vec<String>,
}

/// Output record for paginated books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "CategoryID")]
    pub category_id: String,
    pub book_link: String,
    pub book_title: String,
    pub sentences: Vec<String>,
}

/// Output record for table-of-contents books and print versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TocRecord {
    pub book_title: String,
    pub chapter: String,
    pub link_text: String,
    pub wiki_link: String,
    pub paragraphs: Vec<String>,
}
