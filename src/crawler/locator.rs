//! Sitemap location discovery
//!
//! Probes the well-known sitemap locations under a site root, in priority
//! order, until one of them serves a parseable sitemap document.

use crate::crawler::error::{NotFoundError, ProbeFailure};
use crate::crawler::fetcher::AuthenticatedFetcher;
use crate::crawler::parser::{parse_sitemap, ParsedDocument};
use crate::crawler::result::SitemapRef;
use crate::url::{join_base, resolve_reference};

/// Candidate paths, highest priority first
pub const CANDIDATE_PATHS: [&str; 5] = [
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemaps/sitemap.xml",
    "/sitemaps/sitemap_index.xml",
    "/sitemap",
];

/// The first candidate that resolved, with its document already parsed
#[derive(Debug, Clone)]
pub struct LocatedSitemap {
    pub reference: SitemapRef,
    pub document: ParsedDocument,
    /// Candidates that were tried and rejected before this one
    pub attempts: Vec<ProbeFailure>,
}

/// Returns the full candidate URLs for a base URL, in probe order
///
/// A trailing `/` on the base is dropped before joining. Candidates are
/// serialized the same way child references are (lower-cased host, default
/// port removed), so an index that lists the root sitemap matches it in the
/// visited set.
pub fn candidate_urls(base_url: &str) -> Vec<String> {
    CANDIDATE_PATHS
        .iter()
        .map(|path| {
            let joined = join_base(base_url, path);
            resolve_reference(&joined, &joined).unwrap_or(joined)
        })
        .collect()
}

/// Finds the root sitemap of a site
#[derive(Debug, Clone)]
pub struct SitemapLocator {
    fetcher: AuthenticatedFetcher,
}

impl SitemapLocator {
    pub fn new(fetcher: AuthenticatedFetcher) -> Self {
        Self { fetcher }
    }

    /// Returns the reference of the first candidate that resolves
    pub async fn locate(&self, base_url: &str) -> Result<SitemapRef, NotFoundError> {
        self.locate_document(base_url)
            .await
            .map(|located| located.reference)
    }

    /// Probes every candidate in order and returns the first that resolves
    ///
    /// A candidate resolves when it answers HTTP 200 with a body that parses
    /// as a `urlset` or `sitemapindex`. Anything else (error status, transport
    /// failure, HTML soft-404 page) is recorded and the next candidate is
    /// tried.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` carrying every attempt, in probe order, when no
    /// candidate resolves.
    pub async fn locate_document(&self, base_url: &str) -> Result<LocatedSitemap, NotFoundError> {
        let mut attempts = Vec::new();

        for url in candidate_urls(base_url) {
            tracing::debug!("Probing sitemap candidate {}", url);

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::debug!("Candidate {} rejected: {}", url, e.detail);
                    attempts.push(ProbeFailure {
                        url,
                        reason: e.detail,
                    });
                    continue;
                }
            };

            match parse_sitemap(&fetched.body) {
                Ok(document) => {
                    tracing::debug!("Candidate {} is a {}", url, document.kind());
                    return Ok(LocatedSitemap {
                        reference: SitemapRef::new(url),
                        document,
                        attempts,
                    });
                }
                Err(e) => {
                    tracing::debug!("Candidate {} is not a sitemap: {}", url, e);
                    attempts.push(ProbeFailure {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(NotFoundError {
            base_url: base_url.to_string(),
            attempts,
        })
    }
}
