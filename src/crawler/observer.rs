//! Crawl event observers
//!
//! The coordinator reports progress as structured [`CrawlEvent`]s to an
//! injected [`CrawlObserver`] rather than logging directly, so callers decide
//! whether events go to `tracing`, get recorded, or are dropped.

use crate::crawler::parser::DocumentKind;
use crate::crawler::result::SitemapRef;
use crate::state::CrawlPhase;
use std::sync::Mutex;

/// Something that happened during a crawl session
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    PhaseChanged {
        from: CrawlPhase,
        to: CrawlPhase,
    },
    /// A candidate location did not resolve
    ProbeFailed {
        url: String,
        reason: String,
    },
    SitemapLocated {
        sitemap: SitemapRef,
    },
    SitemapFetched {
        sitemap: SitemapRef,
        kind: DocumentKind,
        entries: usize,
    },
    /// A reference was not fetched because it was already visited
    SitemapSkipped {
        sitemap: SitemapRef,
        reason: String,
    },
    SitemapFailed {
        sitemap: SitemapRef,
        reason: String,
    },
    Categorized {
        total_urls: usize,
    },
    Cancelled {
        phase: CrawlPhase,
        pending: usize,
    },
}

/// Receives crawl events
///
/// Implementations must be thread-safe; the coordinator may be driven from
/// any runtime worker.
pub trait CrawlObserver: Send + Sync {
    /// Called once per event, in the order events happen
    fn on_event(&self, event: &CrawlEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_event(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::PhaseChanged { from, to } => {
                tracing::info!("Phase {} -> {}", from, to);
            }
            CrawlEvent::ProbeFailed { url, reason } => {
                tracing::debug!("No sitemap at {}: {}", url, reason);
            }
            CrawlEvent::SitemapLocated { sitemap } => {
                tracing::info!("Found sitemap at {}", sitemap);
            }
            CrawlEvent::SitemapFetched {
                sitemap,
                kind,
                entries,
            } => {
                tracing::info!("Fetched {} ({}, {} entries)", sitemap, kind, entries);
            }
            CrawlEvent::SitemapSkipped { sitemap, reason } => {
                tracing::warn!("Skipped {}: {}", sitemap, reason);
            }
            CrawlEvent::SitemapFailed { sitemap, reason } => {
                tracing::warn!("Failed to process {}: {}", sitemap, reason);
            }
            CrawlEvent::Categorized { total_urls } => {
                tracing::info!("Categorized {} URLs", total_urls);
            }
            CrawlEvent::Cancelled { phase, pending } => {
                tracing::warn!(
                    "Crawl cancelled during {} ({} sitemaps not fetched)",
                    phase,
                    pending
                );
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {
    fn on_event(&self, _event: &CrawlEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<CrawlEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far
    pub fn events(&self) -> Vec<CrawlEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the phases entered, in order
    pub fn phases(&self) -> Vec<CrawlPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CrawlEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }
}

impl CrawlObserver for CollectingObserver {
    fn on_event(&self, event: &CrawlEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
