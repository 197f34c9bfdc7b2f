//! Sitemap XML parser
//!
//! Recognizes the two document kinds of the sitemaps.org protocol:
//! - `<urlset>`: `<url><loc>` entries are page URLs
//! - `<sitemapindex>`: `<sitemap><loc>` entries point at further sitemaps
//!
//! The parser is pure. Following index entries is the coordinator's job.

use crate::crawler::error::ParseError;
use crate::crawler::result::SitemapRef;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;

/// The two kinds of sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    UrlSet,
    SitemapIndex,
}

impl DocumentKind {
    fn from_root(name: &str) -> Result<Self, ParseError> {
        match name {
            "urlset" => Ok(Self::UrlSet),
            "sitemapindex" => Ok(Self::SitemapIndex),
            other => Err(ParseError::UnrecognizedRoot(other.to_string())),
        }
    }

    /// Name of the element wrapping each `<loc>` in this kind of document
    fn entry_tag(&self) -> &'static str {
        match self {
            Self::UrlSet => "url",
            Self::SitemapIndex => "sitemap",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlSet => write!(f, "urlset"),
            Self::SitemapIndex => write!(f, "sitemapindex"),
        }
    }
}

/// A successfully parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDocument {
    /// Page URLs, in document order
    UrlSet { urls: Vec<String> },
    /// Child sitemap references, in document order
    IndexSet { sitemap_refs: Vec<SitemapRef> },
}

impl ParsedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::UrlSet { .. } => DocumentKind::UrlSet,
            Self::IndexSet { .. } => DocumentKind::SitemapIndex,
        }
    }

    /// Number of `<loc>` entries in the document
    pub fn len(&self) -> usize {
        match self {
            Self::UrlSet { urls } => urls.len(),
            Self::IndexSet { sitemap_refs } => sitemap_refs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses a sitemap or sitemap-index document
///
/// The document kind is decided by the local name of the root element, so
/// namespace prefixes (`<sm:urlset>`) are accepted. Only `<loc>` elements that
/// are direct children of an entry are collected; nested extension locations
/// such as `<image:loc>` are ignored. `<loc>` text is trimmed and unescaped,
/// CDATA sections are accepted, and blank values are dropped.
///
/// # Errors
///
/// * `ParseError::Empty` - no root element at all
/// * `ParseError::Malformed` - XML syntax error or a truncated document
/// * `ParseError::UnrecognizedRoot` - the root is neither `urlset` nor
///   `sitemapindex` (an HTML error page, for instance)
///
/// # Example
///
/// ```
/// use sitemap_scout::crawler::{parse_sitemap, ParsedDocument};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/products/a</loc></url>
/// </urlset>"#;
///
/// let parsed = parse_sitemap(xml).unwrap();
/// assert_eq!(
///     parsed,
///     ParsedDocument::UrlSet { urls: vec!["https://example.com/products/a".to_string()] }
/// );
/// ```
pub fn parse_sitemap(body: &str) -> Result<ParsedDocument, ParseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut kind: Option<DocumentKind> = None;
    let mut depth: usize = 0;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut loc_text = String::new();
    let mut locs: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match kind {
                    None => kind = Some(DocumentKind::from_root(&name)?),
                    Some(k) if depth == 1 && name == k.entry_tag() => in_entry = true,
                    Some(_) if depth == 2 && in_entry && name == "loc" => {
                        in_loc = true;
                        loc_text.clear();
                    }
                    Some(_) => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if kind.is_none() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    kind = Some(DocumentKind::from_root(&name)?);
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if in_loc && depth == 2 {
                    in_loc = false;
                    let loc = loc_text.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                }
                if in_entry && depth == 1 {
                    in_entry = false;
                }
            }
            Ok(Event::Text(e)) => {
                // Whitespace-only text never reaches here (trim_text)
                if in_loc {
                    let text = e
                        .unescape()
                        .map_err(|err| ParseError::Malformed(err.to_string()))?;
                    loc_text.push_str(&text);
                } else if kind.is_none() {
                    return Err(ParseError::Malformed(
                        "text content outside of a root element".to_string(),
                    ));
                }
            }
            Ok(Event::CData(e)) => {
                if in_loc {
                    loc_text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ParseError::Malformed(format!(
                    "{} (at byte {})",
                    err,
                    reader.error_position()
                )))
            }
            Ok(_) => {}
        }
    }

    let kind = kind.ok_or(ParseError::Empty)?;
    if depth != 0 {
        return Err(ParseError::Malformed(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }

    Ok(match kind {
        DocumentKind::UrlSet => ParsedDocument::UrlSet { urls: locs },
        DocumentKind::SitemapIndex => ParsedDocument::IndexSet {
            sitemap_refs: locs.into_iter().map(SitemapRef::new).collect(),
        },
    })
}
