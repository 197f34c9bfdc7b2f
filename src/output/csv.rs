//! CSV export of product handles

use crate::classify::Category;
use crate::crawler::CrawlResult;
use crate::output::traits::{OutputResult, ReportContext, ReportFormat, ReportWriter};
use crate::url::{extract_path, last_path_segment};

/// Writes `sitemap_product_handles_<domain>_<timestamp>.csv`
///
/// One row per product URL: `Index,Product_URL,Product_Handle`, with a
/// 1-based index in discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl ReportWriter for CsvReportWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(&self, result: &CrawlResult, _context: &ReportContext) -> OutputResult<String> {
        let mut csv = String::from("Index,Product_URL,Product_Handle\r\n");

        for (index, record) in result
            .categorized
            .urls(Category::Products)
            .iter()
            .enumerate()
        {
            let handle = product_handle(&record.url).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{}\r\n",
                index + 1,
                escape_field(&record.url),
                escape_field(&handle)
            ));
        }

        Ok(csv)
    }
}

/// Returns the product handle of a URL
///
/// For `/products/` URLs this is everything after the last `/products/`
/// (so nested handles keep their slashes); otherwise the last path segment.
pub fn product_handle(url: &str) -> Option<String> {
    let path = extract_path(url);
    match path.rsplit_once("/products/") {
        Some((_, handle)) if !handle.is_empty() => Some(handle.trim_end_matches('/').to_string()),
        _ => last_path_segment(url),
    }
}

/// Quotes a field per RFC 4180 when it contains a delimiter, quote or newline
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
