//! Error types produced while locating, fetching and parsing sitemaps

use crate::crawler::result::SitemapRef;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The server answered with something other than 200
    HttpStatus,
    /// No usable answer: connect failure, reset, timeout, truncated body
    Transport,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus => write!(f, "http_status"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

/// A failed GET request
#[derive(Debug, Clone, Error)]
#[error("{kind} error fetching {url}: {detail}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub url: String,
    /// HTTP status code, for `HttpStatus` failures only
    pub status: Option<u16>,
    pub detail: String,
}

impl FetchError {
    pub fn http_status(url: &str, status: u16) -> Self {
        Self {
            kind: FetchErrorKind::HttpStatus,
            url: url.to_string(),
            status: Some(status),
            detail: format!("HTTP {}", status),
        }
    }

    pub fn transport(url: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            url: url.to_string(),
            status: None,
            detail: detail.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FetchErrorKind::Transport
    }
}

/// A sitemap document that could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("document has no root element")]
    Empty,

    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("unrecognized root element <{0}>")]
    UnrecognizedRoot(String),
}

/// One failed probe of a candidate sitemap location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub url: String,
    pub reason: String,
}

/// No candidate location produced a sitemap
///
/// Every attempted URL is kept, in probe order, together with the reason it
/// was rejected.
#[derive(Debug, Clone, Error)]
#[error("no sitemap found under {base_url} ({} locations tried: {})", .attempts.len(), format_attempts(.attempts))]
pub struct NotFoundError {
    pub base_url: String,
    pub attempts: Vec<ProbeFailure>,
}

fn format_attempts(attempts: &[ProbeFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} => {}", a.url, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Classification of a non-fatal crawl error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "fetch_kind")]
pub enum CrawlErrorKind {
    /// A child sitemap could not be fetched
    Fetch(FetchErrorKind),
    /// A child sitemap was fetched but could not be parsed
    Parse,
    /// A sitemap reference was already visited and was skipped
    CycleSkipped,
    /// The session was cancelled before the tree was fully expanded
    Cancelled,
}

impl fmt::Display for CrawlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(kind) => write!(f, "fetch ({})", kind),
            Self::Parse => write!(f, "parse"),
            Self::CycleSkipped => write!(f, "cycle skipped"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A recorded, non-fatal failure during a crawl session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlError {
    pub kind: CrawlErrorKind,
    /// The sitemap the failure concerns; `None` for session-level errors
    pub sitemap: Option<SitemapRef>,
    pub detail: String,
}

impl CrawlError {
    pub fn fetch(sitemap: SitemapRef, error: &FetchError) -> Self {
        Self {
            kind: CrawlErrorKind::Fetch(error.kind),
            sitemap: Some(sitemap),
            detail: error.detail.clone(),
        }
    }

    pub fn parse(sitemap: SitemapRef, error: &ParseError) -> Self {
        Self {
            kind: CrawlErrorKind::Parse,
            sitemap: Some(sitemap),
            detail: error.to_string(),
        }
    }

    pub fn cycle(sitemap: SitemapRef, parent: &SitemapRef) -> Self {
        Self {
            kind: CrawlErrorKind::CycleSkipped,
            detail: format!("already visited (referenced again from {})", parent),
            sitemap: Some(sitemap),
        }
    }

    /// A `<loc>` in an index that cannot be turned into an HTTP(S) URL
    pub fn invalid_reference(loc: SitemapRef, parent: &SitemapRef) -> Self {
        Self {
            kind: CrawlErrorKind::Parse,
            detail: format!("unusable sitemap reference in {}", parent),
            sitemap: Some(loc),
        }
    }

    pub fn cancelled(detail: impl Into<String>) -> Self {
        Self {
            kind: CrawlErrorKind::Cancelled,
            sitemap: None,
            detail: detail.into(),
        }
    }

    /// Returns true if this error means a sitemap could not be fetched or parsed
    pub fn is_sitemap_failure(&self) -> bool {
        matches!(self.kind, CrawlErrorKind::Fetch(_) | CrawlErrorKind::Parse)
    }
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sitemap {
            Some(sitemap) => write!(f, "[{}] {}: {}", self.kind, sitemap, self.detail),
            None => write!(f, "[{}] {}", self.kind, self.detail),
        }
    }
}
