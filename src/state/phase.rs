/// Crawl session phase definitions
///
/// A session moves strictly forward through these phases. The only branch is
/// `Locating -> Failed`, taken when no sitemap can be found at all.
use serde::Serialize;
use std::fmt;

/// Represents the current phase of one crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlPhase {
    /// Session created, nothing requested yet
    Init,

    /// Probing candidate sitemap locations
    Locating,

    /// Expanding the sitemap tree
    Fetching,

    /// Assigning every collected URL to a category
    Categorizing,

    /// Computing counts, naming patterns and duplicates
    Analyzing,

    // ===== Terminal States =====
    /// Session finished and produced a result
    Done,

    /// No sitemap could be located
    Failed,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Locating)
                | (Self::Locating, Self::Fetching)
                | (Self::Locating, Self::Failed)
                | (Self::Fetching, Self::Categorizing)
                | (Self::Categorizing, Self::Analyzing)
                | (Self::Analyzing, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Locating => "locating",
            Self::Fetching => "fetching",
            Self::Categorizing => "categorizing",
            Self::Analyzing => "analyzing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
