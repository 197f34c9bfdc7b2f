//! State module for tracking crawl session progress
//!
//! - `CrawlPhase`: the coordinator's state machine (init, locating, fetching,
//!   categorizing, analyzing, done, failed)

mod phase;

pub use phase::CrawlPhase;
