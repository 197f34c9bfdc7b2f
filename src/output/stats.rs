//! Console summary of a finished crawl
//!
//! This module provides the short summary printed to stdout after a crawl,
//! next to the exported files.

use crate::classify::Category;
use crate::crawler::CrawlResult;

/// Formats the console summary
///
/// # Arguments
///
/// * `result` - The finished crawl
pub fn format_summary(result: &CrawlResult) -> String {
    let mut out = String::new();
    let total = result.total_urls();

    out.push_str("=== Sitemap Crawl Summary ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Base URL: {}\n", result.base_url));
    out.push_str(&format!("  Sitemaps visited: {}\n", result.sitemaps_visited.len()));
    out.push_str(&format!("  URLs categorized: {}\n", total));
    out.push_str(&format!("  Sitemaps failed: {}\n", result.failed_sitemaps().len()));
    out.push_str(&format!("  Duplicate URLs: {}\n", result.report.duplicates.len()));
    out.push_str(&format!("  Duration: {:.2}s\n", result.duration_seconds()));
    if result.was_cancelled() {
        out.push_str("  Crawl was cancelled; results are partial\n");
    }
    out.push('\n');

    out.push_str("URLs by Category:\n");
    for category in Category::ALL {
        let count = result.categorized.count(category);
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "  {:<15} {:>8} ({:.1}%)\n",
            category.label(),
            count,
            percentage
        ));
    }

    out
}

/// Prints the console summary to stdout
pub fn print_summary(result: &CrawlResult) {
    println!("{}", format_summary(result));
}
