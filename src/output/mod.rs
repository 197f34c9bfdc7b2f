//! Output module for exporting crawl results
//!
//! This module handles:
//! - JSON export of the full categorized inventory
//! - CSV export of product handles
//! - The plain-text analysis report
//! - The console summary

mod csv;
mod json;
pub mod stats;
mod text;
mod traits;

pub use csv::{product_handle, CsvReportWriter};
pub use json::JsonReportWriter;
pub use stats::{format_summary, print_summary};
pub use text::{format_text_report, ProductAssessment, TextReportWriter, LOW_PRODUCT_COUNT};
pub use traits::{OutputError, OutputResult, ReportContext, ReportFormat, ReportWriter};

use crate::crawler::CrawlResult;
use crate::url::domain_slug;
use std::path::{Path, PathBuf};

/// Returns the writer for a format
pub fn writer_for(format: ReportFormat) -> Box<dyn ReportWriter> {
    match format {
        ReportFormat::Json => Box::new(JsonReportWriter),
        ReportFormat::Csv => Box::new(CsvReportWriter),
        ReportFormat::Text => Box::new(TextReportWriter),
    }
}

/// Builds `<prefix>_<domain>_<timestamp>.<ext>` for a format
pub fn report_file_name(format: ReportFormat, base_url: &str, context: &ReportContext) -> String {
    format!(
        "{}_{}_{}.{}",
        format.file_prefix(),
        domain_slug(base_url),
        context.file_timestamp(),
        format.extension()
    )
}

/// Renders and writes every requested format into `directory`
///
/// The directory is created if missing. A format listed twice is written
/// once.
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `context` - Run information (timestamp, config hash)
/// * `directory` - Destination directory
/// * `formats` - Formats to write, in order
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written files, in `formats` order
/// * `Err(OutputError)` - Rendering or writing failed
pub fn write_reports(
    result: &CrawlResult,
    context: &ReportContext,
    directory: &Path,
    formats: &[ReportFormat],
) -> OutputResult<Vec<PathBuf>> {
    std::fs::create_dir_all(directory)?;

    let mut written = Vec::new();
    let mut seen = Vec::new();

    for format in formats {
        if seen.contains(format) {
            continue;
        }
        seen.push(*format);

        let content = writer_for(*format).render(result, context)?;
        let path = directory.join(report_file_name(*format, &result.base_url, context));
        std::fs::write(&path, content)
            .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Wrote {} report to {}", format, path.display());
        written.push(path);
    }

    Ok(written)
}
