use crate::sitemap::parser::SitemapEntry;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid CDATA regex"));

static EMPTY_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z_][A-Za-z0-9_:.\-]*)(\s[^<>]*?)?\s*/>").expect("valid empty element regex")
});

/// Collapse entries sharing a `loc`.
///
/// The first occurrence keeps its position; a later duplicate overwrites its
/// `lastmod`.
pub fn dedup_entries(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<SitemapEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        match positions.get(&entry.loc) {
            Some(&pos) => unique[pos].lastmod = entry.lastmod,
            None => {
                positions.insert(entry.loc.clone(), unique.len());
                unique.push(entry);
            }
        }
    }

    unique
}

/// Check if a response body starts like a markup document
pub fn looks_like_markup(body: &str) -> bool {
    body.trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with('<')
}

/// Rewrite XML-only syntax into markup an HTML parser reads the same way.
///
/// CDATA sections become escaped text and `<tag/>` becomes `<tag></tag>`.
pub fn normalize_xml(markup: &str) -> String {
    let unwrapped = CDATA.replace_all(markup, |caps: &Captures| {
        caps[1]
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    });

    EMPTY_ELEMENT
        .replace_all(&unwrapped, |caps: &Captures| {
            let name = &caps[1];
            let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            format!("<{}{}></{}>", name, attrs, name)
        })
        .into_owned()
}
