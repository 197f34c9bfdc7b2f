//! Sitemap-Scout: a sitemap inventory crawler
//!
//! This crate locates a website's sitemap, walks the full sitemap tree
//! (optionally presenting signed bot-access headers), sorts every discovered
//! URL into a fixed set of categories, and reports naming patterns and
//! duplicates over the result.

pub mod analysis;
pub mod auth;
pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    NotFound(#[from] crawler::NotFoundError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid value for header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid category rule: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Sitemap-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analysis::{PatternAnalyzer, PatternReport};
pub use auth::{Credentials, SignatureProvider};
pub use classify::{Categorizer, CategorizedUrlSet, Category};
pub use config::Config;
pub use crawler::{
    AuthenticatedFetcher, CrawlCoordinator, CrawlError, CrawlErrorKind, CrawlResult,
    CrawlSettings, SitemapLocator, SitemapRef, UrlRecord,
};
pub use state::CrawlPhase;
