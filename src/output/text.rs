//! Plain-text analysis report
//!
//! This module generates the human-readable report of a crawl: summary,
//! category breakdown, naming patterns, host distribution, duplicates, the
//! product count assessment, failed sitemaps, and the full URL listing.

use crate::analysis::NamingBucket;
use crate::classify::Category;
use crate::crawler::CrawlResult;
use crate::output::traits::{OutputResult, ReportContext, ReportFormat, ReportWriter};

/// Below this many products the count is flagged as low
pub const LOW_PRODUCT_COUNT: usize = 100;

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str = "----------------------------------------";

/// How the number of products found should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAssessment {
    None,
    Low,
    Healthy,
}

impl ProductAssessment {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            n if n < LOW_PRODUCT_COUNT => Self::Low,
            _ => Self::Healthy,
        }
    }
}

/// Writes `sitemap_report_<domain>_<timestamp>.txt`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportWriter;

impl ReportWriter for TextReportWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, result: &CrawlResult, context: &ReportContext) -> OutputResult<String> {
        Ok(format_text_report(result, context))
    }
}

/// Formats a crawl result as a plain-text report
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `context` - Run information (timestamp, config hash)
///
/// # Returns
///
/// The report text
pub fn format_text_report(result: &CrawlResult, context: &ReportContext) -> String {
    let mut out = String::new();
    let report = &result.report;
    let failed = result.failed_sitemaps();

    // Title
    out.push_str(&format!("{}\nSITEMAP ANALYSIS REPORT\n{}\n", RULE, RULE));
    out.push_str(&format!(
        "Generated: {}\n",
        context.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(hash) = &context.config_hash {
        out.push_str(&format!("Config Hash: {}\n", hash));
    }
    out.push_str(&format!("{}\n\n", RULE));

    // Summary
    out.push_str(&format!("SUMMARY:\n{}\n", THIN_RULE));
    out.push_str(&format!("Base URL: {}\n", result.base_url));
    out.push_str(&format!("Crawl Date: {}\n", result.finished_at.to_rfc3339()));
    out.push_str(&format!("Duration: {:.2} seconds\n", result.duration_seconds()));
    out.push_str(&format!("Sitemaps Visited: {}\n", result.sitemaps_visited.len()));
    out.push_str(&format!("URLs Categorized: {}\n", result.total_urls()));
    out.push_str(&format!("Sitemaps Failed: {}\n", failed.len()));
    if result.was_cancelled() {
        out.push_str("Status: cancelled before the sitemap tree was fully expanded\n");
    }
    out.push('\n');

    // Category breakdown
    out.push_str(&format!("CATEGORY BREAKDOWN:\n{}\n", THIN_RULE));
    for category in Category::ALL {
        let count = result.categorized.count(category);
        let percentage = report
            .category(category)
            .map(|s| s.percentage)
            .unwrap_or(0.0);
        out.push_str(&format!(
            "{:<15}: {:>8} URLs ({:>5.1}%)\n",
            category.label().to_uppercase(),
            count,
            percentage
        ));
    }
    out.push_str(&format!("{:<15}: {:>8} URLs\n\n", "TOTAL", report.total_urls));

    // Naming patterns and hosts per non-empty category
    for category in Category::ALL {
        let Some(stats) = report.category(category) else {
            continue;
        };
        if stats.count == 0 {
            continue;
        }

        out.push_str(&format!(
            "{} ANALYSIS:\n{}\n",
            category.label().to_uppercase(),
            THIN_RULE
        ));
        out.push_str(&format!("Handles sampled: {}\n", stats.naming.sampled));
        out.push_str("Naming Patterns:\n");
        for bucket in NamingBucket::ALL {
            let stat = stats.naming.get(bucket);
            out.push_str(&format!(
                "  {:<20}: {:>6} ({:>5.1}%)\n",
                bucket.label(),
                stat.count,
                stat.fraction * 100.0
            ));
        }
        out.push_str("Host Distribution:\n");
        for (host, count) in &stats.hosts {
            let share = (*count as f64 / stats.count as f64) * 100.0;
            out.push_str(&format!("  {:<30}: {:>6} ({:>5.1}%)\n", host, count, share));
        }
        out.push('\n');
    }

    // Duplicates
    out.push_str(&format!("DUPLICATE DETECTION:\n{}\n", THIN_RULE));
    if report.duplicates.is_empty() {
        out.push_str("No duplicate URLs found\n\n");
    } else {
        out.push_str(&format!(
            "{} URLs appear more than once (ignoring query and fragment):\n",
            report.duplicates.len()
        ));
        for url in &report.duplicates {
            out.push_str(&format!("  - {}\n", url));
        }
        out.push('\n');
    }

    // Product count assessment
    let products = result.categorized.count(Category::Products);
    out.push_str(&format!("PRODUCT COUNT ANALYSIS:\n{}\n", THIN_RULE));
    out.push_str(&format!("Total Products Found: {}\n", products));
    match ProductAssessment::from_count(products) {
        ProductAssessment::None => {
            out.push_str("No products found in sitemap. Possible reasons:\n");
            out.push_str("  1. Products are in draft status (not published)\n");
            out.push_str("  2. Products are archived or hidden\n");
            out.push_str("  3. Sitemap generation excludes certain product types\n");
            out.push_str("  4. Products have restricted visibility settings\n");
        }
        ProductAssessment::Low => {
            out.push_str(&format!("Low product count ({}). Consider checking:\n", products));
            out.push_str("  1. Sitemap generation settings\n");
            out.push_str("  2. Product publication status\n");
            out.push_str("  3. Store configuration\n");
        }
        ProductAssessment::Healthy => {
            out.push_str(&format!(
                "Good product count found ({} products). Consider monitoring for changes over time.\n",
                products
            ));
        }
    }
    out.push('\n');

    // Failed sitemaps, kept apart from the categorized URLs
    out.push_str(&format!("FAILED SITEMAPS:\n{}\n", THIN_RULE));
    if failed.is_empty() {
        out.push_str("None\n\n");
    } else {
        for error in &failed {
            out.push_str(&format!("  - {}\n", error));
        }
        out.push('\n');
    }

    let other_errors: Vec<_> = result
        .errors
        .iter()
        .filter(|e| !e.is_sitemap_failure())
        .collect();
    if !other_errors.is_empty() {
        out.push_str(&format!("OTHER NOTICES:\n{}\n", THIN_RULE));
        for error in other_errors {
            out.push_str(&format!("  - {}\n", error));
        }
        out.push('\n');
    }

    // Full listing
    out.push_str(&format!("{}\nALL URLS ({})\n{}\n", RULE, result.total_urls(), RULE));
    for (index, record) in result.categorized.all_urls.iter().enumerate() {
        out.push_str(&format!("{:>6}. {}\n", index + 1, record.url));
    }
    out.push('\n');

    out.push_str(&format!("{}\nURLS BY CATEGORY\n{}\n", RULE, RULE));
    for category in Category::ALL {
        let urls = result.categorized.urls(category);
        if urls.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "\n{} ({}):\n",
            category.label().to_uppercase(),
            urls.len()
        ));
        for record in urls {
            out.push_str(&format!("  {}\n", record.url));
        }
    }

    out
}
