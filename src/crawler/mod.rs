//! Crawler module for sitemap discovery and expansion
//!
//! This module contains the core crawling logic, including:
//! - Authenticated HTTP fetching with retry logic
//! - Sitemap location probing
//! - Sitemap and sitemap-index parsing
//! - Crawl session coordination

mod coordinator;
mod error;
mod fetcher;
mod locator;
mod observer;
mod parser;
mod result;

pub use coordinator::{CrawlCoordinator, CrawlSettings, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use error::{
    CrawlError, CrawlErrorKind, FetchError, FetchErrorKind, NotFoundError, ParseError,
    ProbeFailure,
};
pub use fetcher::{
    build_http_client, AuthenticatedFetcher, FetchSettings, FetchedDocument, DEFAULT_USER_AGENT,
};
pub use locator::{candidate_urls, LocatedSitemap, SitemapLocator, CANDIDATE_PATHS};
pub use observer::{CollectingObserver, CrawlEvent, CrawlObserver, NoopObserver, TracingObserver};
pub use parser::{parse_sitemap, DocumentKind, ParsedDocument};
pub use result::{CrawlResult, SitemapRef, UrlRecord};

use crate::config::Config;
use crate::ScoutError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl session described by a configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Convert the configuration into crawl settings and credentials
/// 2. Locate the root sitemap
/// 3. Expand the sitemap tree
/// 4. Categorize and analyze the collected URLs
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `cancel` - Token that stops the crawl early when cancelled
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed (possibly cancelled part-way)
/// * `Err(ScoutError)` - No sitemap was found, or the session could not start
pub async fn crawl(config: &Config, cancel: CancellationToken) -> Result<CrawlResult, ScoutError> {
    let settings = config.crawl_settings()?;
    let mut coordinator =
        CrawlCoordinator::new(config.site.base_url.clone(), settings, config.credentials());
    coordinator.run(cancel).await
}
