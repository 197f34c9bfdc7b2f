//! Report writer traits and types
//!
//! This module defines the trait interface for report writers and the
//! context they receive alongside a crawl result.

use crate::crawler::CrawlResult;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Available export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Full inventory with metadata, categories, analysis and errors
    Json,
    /// Product URLs and handles
    Csv,
    /// Human-readable analysis report
    Text,
}

impl ReportFormat {
    /// File name prefix used for exports of this format
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Json => "sitemap_urls",
            Self::Csv => "sitemap_product_handles",
            Self::Text => "sitemap_report",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Information about the run that is not part of the crawl result itself
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// SHA-256 of the configuration file, when one was used
    pub config_hash: Option<String>,

    /// Timestamp stamped into file names and report headers
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(config_hash: Option<String>) -> Self {
        Self {
            config_hash,
            generated_at: Utc::now(),
        }
    }

    /// `YYYYmmdd_HHMMSS` form of `generated_at`
    pub fn file_timestamp(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// Trait for report writers
///
/// A writer turns a finished crawl into the text of one export file. Writers
/// never touch the filesystem; `write_reports` does that.
pub trait ReportWriter {
    /// The format this writer produces
    fn format(&self) -> ReportFormat;

    /// Renders the export
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl
    /// * `context` - Run information such as the config hash
    fn render(&self, result: &CrawlResult, context: &ReportContext) -> OutputResult<String>;
}
