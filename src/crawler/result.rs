//! Data produced by a crawl session

use crate::analysis::PatternReport;
use crate::classify::CategorizedUrlSet;
use crate::crawler::error::CrawlError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A URL pointing at a sitemap or sitemap-index document
///
/// Two references are the same sitemap exactly when their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SitemapRef(String);

impl SitemapRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SitemapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SitemapRef {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for SitemapRef {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// One page URL discovered in a `urlset` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub url: String,
    pub source_sitemap: SitemapRef,
}

impl UrlRecord {
    pub fn new(url: impl Into<String>, source_sitemap: SitemapRef) -> Self {
        Self {
            url: url.into(),
            source_sitemap,
        }
    }
}

/// The complete output of one crawl session
///
/// This is the only thing exporters see. It is built by the coordinator and
/// never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every sitemap answered with HTTP 200, in document order, including
    /// documents that then failed to parse
    pub sitemaps_visited: Vec<SitemapRef>,
    pub categorized: CategorizedUrlSet,
    pub report: PatternReport,
    pub errors: Vec<CrawlError>,
}

impl CrawlResult {
    /// Number of URLs that made it into the categorized set
    pub fn total_urls(&self) -> usize {
        self.categorized.all_urls.len()
    }

    /// Errors for sitemaps that could not be fetched or parsed
    ///
    /// Kept separate from [`CrawlResult::total_urls`]: a report must never
    /// fold failed sitemaps into the categorized URL count.
    pub fn failed_sitemaps(&self) -> Vec<&CrawlError> {
        self.errors
            .iter()
            .filter(|e| e.is_sitemap_failure())
            .collect()
    }

    /// Returns true if the session was cut short by cancellation
    pub fn was_cancelled(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.kind == crate::crawler::CrawlErrorKind::Cancelled)
    }

    /// Wall-clock duration of the session in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
