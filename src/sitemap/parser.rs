use crate::sitemap::error::SitemapError;
use crate::sitemap::utils::{dedup_entries, normalize_xml};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

const LOC: &str = "loc";
const LASTMOD: &str = "lastmod";

/// A `loc`/`lastmod` pair taken from one `<sitemap>` or `<url>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// The location URL, never empty
    pub loc: String,

    /// The last-modified timestamp, as written in the document
    pub lastmod: Option<String>,
}

/// The element that delimits one entry in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `<sitemap>` elements of a sitemap index
    Sitemap,

    /// `<url>` elements of a sitemap
    Url,
}

impl EntryKind {
    /// The tag name of the entry element
    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::Sitemap => "sitemap",
            EntryKind::Url => "url",
        }
    }
}

/// How `loc` and `lastmod` are located for an entry element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairingMode {
    /// Only direct children of the entry element
    #[default]
    Scoped,

    /// The nearest matching element anywhere after the entry element in
    /// document order. A malformed entry borrows its neighbour's values.
    FollowingNode,
}

/// Entries extracted from one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSitemap {
    /// Number of entry elements in the document, duplicates included
    pub tag_count: usize,

    /// Distinct entries in first-occurrence order
    pub entries: Vec<SitemapEntry>,
}

/// Extract the entries of a sitemap or sitemap index.
///
/// `source` is only used to label errors. Every entry element must carry a
/// non-empty `loc`. `lastmod` is optional in scoped mode; in following-node
/// mode a `lastmod` must follow every entry element.
pub fn parse_entries(
    markup: &str,
    kind: EntryKind,
    pairing: PairingMode,
    source: &str,
) -> Result<ParsedSitemap, SitemapError> {
    // CDATA and empty-element tags mean nothing to an HTML parser
    let document = Html::parse_document(&normalize_xml(markup));

    // Every element in document order
    let elements: Vec<ElementRef> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();

    let mut raw = Vec::new();
    for (idx, element) in elements.iter().enumerate() {
        if element.value().name() != kind.tag() {
            continue;
        }

        let (loc, lastmod) = match pairing {
            PairingMode::Scoped => (child_text(element, LOC), child_text(element, LASTMOD)),
            PairingMode::FollowingNode => {
                let rest = &elements[idx + 1..];
                let lastmod = following_text(rest, LASTMOD).ok_or_else(|| {
                    SitemapError::MissingTag {
                        tag: LASTMOD,
                        parent: kind.tag(),
                        url: source.to_string(),
                    }
                })?;
                (following_text(rest, LOC), Some(lastmod))
            }
        };

        // An empty <lastmod/> carries no timestamp
        let lastmod = lastmod.filter(|value| !value.is_empty());

        let loc = loc.ok_or_else(|| SitemapError::MissingTag {
            tag: LOC,
            parent: kind.tag(),
            url: source.to_string(),
        })?;

        if loc.is_empty() {
            return Err(SitemapError::EmptyLocation {
                parent: kind.tag(),
                url: source.to_string(),
            });
        }

        raw.push(SitemapEntry { loc, lastmod });
    }

    Ok(ParsedSitemap {
        tag_count: raw.len(),
        entries: dedup_entries(raw),
    })
}

fn child_text(element: &ElementRef, tag: &str) -> Option<String> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == tag)
        .map(|child| element_text(&child))
}

fn following_text(rest: &[ElementRef], tag: &str) -> Option<String> {
    rest.iter()
        .find(|el| el.value().name() == tag)
        .map(element_text)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
