//! Crawler coordinator - crawl session orchestration
//!
//! This module drives one crawl session through its phases:
//! - Locating the root sitemap
//! - Expanding the sitemap tree with bounded concurrent fetches
//! - Categorizing every collected URL
//! - Analyzing naming patterns and duplicates
//!
//! Tree expansion uses an explicit worklist and visited set, so cyclic or
//! self-referencing sitemap indexes always terminate.

use crate::analysis::PatternAnalyzer;
use crate::auth::{Credentials, SignatureProvider};
use crate::classify::{Categorizer, CategoryRule};
use crate::crawler::error::{CrawlError, FetchError};
use crate::crawler::fetcher::{AuthenticatedFetcher, FetchSettings, FetchedDocument};
use crate::crawler::locator::SitemapLocator;
use crate::crawler::observer::{CrawlEvent, CrawlObserver, TracingObserver};
use crate::crawler::parser::{parse_sitemap, ParsedDocument};
use crate::crawler::result::{CrawlResult, SitemapRef, UrlRecord};
use crate::state::CrawlPhase;
use crate::url::resolve_reference;
use crate::ScoutError;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Default number of sitemap fetches allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Tunables for one crawl session
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub fetch: FetchSettings,

    /// Upper bound on concurrent child sitemap fetches (at least 1)
    pub max_concurrent_fetches: usize,

    /// Category rules tried before the built-in table
    pub extra_rules: Vec<CategoryRule>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            extra_rules: Vec::new(),
        }
    }
}

/// A sitemap waiting to be fetched
///
/// `key` is the list of entry positions leading from the root to this
/// sitemap. Sorting by key gives depth-first document order.
#[derive(Debug, Clone)]
struct PendingSitemap {
    reference: SitemapRef,
    key: Vec<usize>,
}

/// Everything gathered while expanding the sitemap tree
#[derive(Debug, Default)]
struct Expansion {
    visited: HashSet<SitemapRef>,
    queue: VecDeque<PendingSitemap>,
    fetched: Vec<(Vec<usize>, SitemapRef)>,
    records: Vec<(Vec<usize>, usize, UrlRecord)>,
    errors: Vec<CrawlError>,
}

impl Expansion {
    /// Flattens collected records and visited sitemaps into document order
    fn into_ordered(mut self) -> (Vec<UrlRecord>, Vec<SitemapRef>, Vec<CrawlError>) {
        self.records
            .sort_by(|(a_key, a_pos, _), (b_key, b_pos, _)| (a_key, a_pos).cmp(&(b_key, b_pos)));
        self.fetched.sort_by(|(a, _), (b, _)| a.cmp(b));

        let records = self.records.into_iter().map(|(_, _, r)| r).collect();
        let visited = self.fetched.into_iter().map(|(_, s)| s).collect();
        (records, visited, self.errors)
    }
}

/// Runs one crawl session from base URL to `CrawlResult`
pub struct CrawlCoordinator {
    base_url: String,
    settings: CrawlSettings,
    signatures: SignatureProvider,
    observer: Arc<dyn CrawlObserver>,
    phase: CrawlPhase,
}

impl CrawlCoordinator {
    /// Creates a coordinator in the `Init` phase
    ///
    /// # Arguments
    ///
    /// * `base_url` - Site root, e.g. `https://shop.example.com`
    /// * `settings` - Fetch and concurrency settings
    /// * `credentials` - Bot-access signature material; `None` crawls
    ///   unauthenticated
    pub fn new(
        base_url: impl Into<String>,
        settings: CrawlSettings,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            settings,
            signatures: SignatureProvider::new(credentials),
            observer: Arc::new(TracingObserver),
            phase: CrawlPhase::Init,
        }
    }

    /// Replaces the default `TracingObserver`
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn emit(&self, event: CrawlEvent) {
        self.observer.on_event(&event);
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), ScoutError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        let from = self.phase;
        self.phase = next;
        self.emit(CrawlEvent::PhaseChanged { from, to: next });
        Ok(())
    }

    /// Runs the session to completion
    ///
    /// Fetch and parse failures of individual sitemaps are recorded in
    /// `CrawlResult::errors` and do not stop the crawl. Cancelling `cancel`
    /// drops in-flight fetches and returns whatever was collected so far,
    /// categorized and analyzed, with a `Cancelled` error appended.
    ///
    /// # Errors
    ///
    /// * `ScoutError::InvalidUrl` - the base URL is not an absolute HTTP(S) URL
    /// * `ScoutError::InvalidHeader` / `ScoutError::Http` - the HTTP client
    ///   could not be built
    /// * `ScoutError::NotFound` - no candidate location served a sitemap; the
    ///   coordinator ends in `Failed`
    /// * `ScoutError::InvalidTransition` - `run` was called on a coordinator
    ///   that already ran
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<CrawlResult, ScoutError> {
        if self.phase.is_terminal() {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Locating,
            });
        }

        let started_at = Utc::now();
        validate_base_url(&self.base_url)?;

        let fetcher = AuthenticatedFetcher::new(self.settings.fetch.clone(), &self.signatures)?;
        if fetcher.is_authenticated() {
            tracing::info!("Requests will carry bot-access signature headers");
        }

        self.transition(CrawlPhase::Locating)?;
        let locator = SitemapLocator::new(fetcher.clone());
        let located = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = locator.locate_document(&self.base_url) => Some(result),
        };

        let mut expansion = Expansion::default();
        match located {
            None => {
                self.emit(CrawlEvent::Cancelled {
                    phase: CrawlPhase::Locating,
                    pending: 0,
                });
                expansion
                    .errors
                    .push(CrawlError::cancelled("cancelled before a sitemap was located"));
                self.transition(CrawlPhase::Fetching)?;
            }
            Some(Err(not_found)) => {
                for attempt in &not_found.attempts {
                    self.emit(CrawlEvent::ProbeFailed {
                        url: attempt.url.clone(),
                        reason: attempt.reason.clone(),
                    });
                }
                self.transition(CrawlPhase::Failed)?;
                return Err(ScoutError::NotFound(not_found));
            }
            Some(Ok(found)) => {
                for attempt in &found.attempts {
                    self.emit(CrawlEvent::ProbeFailed {
                        url: attempt.url.clone(),
                        reason: attempt.reason.clone(),
                    });
                }
                self.emit(CrawlEvent::SitemapLocated {
                    sitemap: found.reference.clone(),
                });
                self.transition(CrawlPhase::Fetching)?;

                let root = PendingSitemap {
                    reference: found.reference,
                    key: Vec::new(),
                };
                expansion.visited.insert(root.reference.clone());
                expansion.fetched.push((root.key.clone(), root.reference.clone()));
                self.absorb(&mut expansion, root, found.document);
                self.expand(&mut expansion, &fetcher, &cancel).await;
            }
        }

        let (records, sitemaps_visited, errors) = expansion.into_ordered();

        self.transition(CrawlPhase::Categorizing)?;
        let categorizer = Categorizer::with_extra_rules(self.settings.extra_rules.clone());
        let categorized = categorizer.categorize_all(records);
        self.emit(CrawlEvent::Categorized {
            total_urls: categorized.len(),
        });

        self.transition(CrawlPhase::Analyzing)?;
        let report = PatternAnalyzer::new().analyze(&categorized);

        self.transition(CrawlPhase::Done)?;

        let result = CrawlResult {
            base_url: self.base_url.clone(),
            started_at,
            finished_at: Utc::now(),
            sitemaps_visited,
            categorized,
            report,
            errors,
        };

        tracing::info!(
            "Crawl of {} finished: {} URLs from {} sitemaps, {} failed, in {:.2}s",
            result.base_url,
            result.total_urls(),
            result.sitemaps_visited.len(),
            result.failed_sitemaps().len(),
            result.duration_seconds()
        );

        Ok(result)
    }

    /// Drains the worklist, keeping at most `max_concurrent_fetches` in flight
    async fn expand(
        &self,
        expansion: &mut Expansion,
        fetcher: &AuthenticatedFetcher,
        cancel: &CancellationToken,
    ) {
        let limit = self.settings.max_concurrent_fetches.max(1);
        let mut in_flight = FuturesUnordered::new();
        let mut completed = 0usize;

        loop {
            while in_flight.len() < limit {
                let Some(next) = expansion.queue.pop_front() else {
                    break;
                };
                let fetcher = fetcher.clone();
                in_flight.push(async move {
                    let outcome = fetcher.fetch(next.reference.as_str()).await;
                    (next, outcome)
                });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let pending = expansion.queue.len() + in_flight.len();
                    self.emit(CrawlEvent::Cancelled {
                        phase: CrawlPhase::Fetching,
                        pending,
                    });
                    expansion.errors.push(CrawlError::cancelled(format!(
                        "cancelled while fetching; {} sitemaps not fetched",
                        pending
                    )));
                    break;
                }
                Some((pending, outcome)) = in_flight.next() => {
                    self.complete(expansion, pending, outcome);
                    completed += 1;
                    if completed % 10 == 0 {
                        tracing::info!(
                            "Progress: {} sitemaps fetched, {} queued, {} in flight",
                            completed,
                            expansion.queue.len(),
                            in_flight.len()
                        );
                    }
                }
            }
        }
    }

    /// Records the outcome of one child fetch
    fn complete(
        &self,
        expansion: &mut Expansion,
        pending: PendingSitemap,
        outcome: Result<FetchedDocument, FetchError>,
    ) {
        let fetched = match outcome {
            Ok(fetched) => fetched,
            Err(e) => {
                self.emit(CrawlEvent::SitemapFailed {
                    sitemap: pending.reference.clone(),
                    reason: e.detail.clone(),
                });
                expansion
                    .errors
                    .push(CrawlError::fetch(pending.reference, &e));
                return;
            }
        };

        expansion
            .fetched
            .push((pending.key.clone(), pending.reference.clone()));

        match parse_sitemap(&fetched.body) {
            Ok(document) => self.absorb(expansion, pending, document),
            Err(e) => {
                self.emit(CrawlEvent::SitemapFailed {
                    sitemap: pending.reference.clone(),
                    reason: e.to_string(),
                });
                expansion
                    .errors
                    .push(CrawlError::parse(pending.reference, &e));
            }
        }
    }

    /// Adds a parsed document to the expansion
    ///
    /// URL entries become records; index entries are resolved, checked
    /// against the visited set and queued.
    fn absorb(&self, expansion: &mut Expansion, parent: PendingSitemap, document: ParsedDocument) {
        self.emit(CrawlEvent::SitemapFetched {
            sitemap: parent.reference.clone(),
            kind: document.kind(),
            entries: document.len(),
        });

        match document {
            ParsedDocument::UrlSet { urls } => {
                for (position, url) in urls.into_iter().enumerate() {
                    expansion.records.push((
                        parent.key.clone(),
                        position,
                        UrlRecord::new(url, parent.reference.clone()),
                    ));
                }
            }
            ParsedDocument::IndexSet { sitemap_refs } => {
                for (position, child) in sitemap_refs.into_iter().enumerate() {
                    let Some(resolved) = resolve_reference(parent.reference.as_str(), child.as_str())
                    else {
                        self.emit(CrawlEvent::SitemapSkipped {
                            sitemap: child.clone(),
                            reason: "not an HTTP(S) URL".to_string(),
                        });
                        expansion
                            .errors
                            .push(CrawlError::invalid_reference(child, &parent.reference));
                        continue;
                    };

                    let resolved = SitemapRef::new(resolved);
                    if !expansion.visited.insert(resolved.clone()) {
                        self.emit(CrawlEvent::SitemapSkipped {
                            sitemap: resolved.clone(),
                            reason: "already visited".to_string(),
                        });
                        expansion
                            .errors
                            .push(CrawlError::cycle(resolved, &parent.reference));
                        continue;
                    }

                    let mut key = parent.key.clone();
                    key.push(position);
                    expansion.queue.push_back(PendingSitemap {
                        reference: resolved,
                        key,
                    });
                }
            }
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ScoutError> {
    let parsed = Url::parse(base_url).map_err(|e| ScoutError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ScoutError::InvalidUrl {
            url: base_url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}
