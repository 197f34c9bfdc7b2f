//! JSON export of the full URL inventory

use crate::crawler::CrawlResult;
use crate::output::traits::{OutputResult, ReportContext, ReportFormat, ReportWriter};

/// Writes `sitemap_urls_<domain>_<timestamp>.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportWriter;

impl ReportWriter for JsonReportWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, result: &CrawlResult, context: &ReportContext) -> OutputResult<String> {
        let failed: Vec<_> = result
            .failed_sitemaps()
            .into_iter()
            .filter_map(|e| e.sitemap.as_ref())
            .collect();

        let report = serde_json::json!({
            "metadata": {
                "generator": "sitemap-scout",
                "version": env!("CARGO_PKG_VERSION"),
                "base_url": result.base_url,
                "crawl_date": result.finished_at.to_rfc3339(),
                "duration_seconds": result.duration_seconds(),
                "total_urls": result.total_urls(),
                "sitemaps_visited": result.sitemaps_visited,
                "failed_sitemaps": failed,
                "cancelled": result.was_cancelled(),
                "config_hash": context.config_hash,
            },
            "categorized_urls": result.categorized,
            "report": result.report,
            "errors": result.errors,
        });

        Ok(serde_json::to_string_pretty(&report)?)
    }
}
