//! Category counts, duplicate detection and the assembled pattern report

use crate::analysis::naming::{naming_patterns, NamingStats};
use crate::classify::{CategorizedUrlSet, Category};
use crate::url::{extract_host, normalize_for_dedup};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Size of one URL list and its share of all URLs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub count: usize,
    /// Percentage of `all_urls`, 0.0 when there are no URLs
    pub percentage: f64,
}

/// Counts and percentages for `all_urls` and every category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub total: usize,
    pub categories: BTreeMap<Category, CategoryShare>,
}

impl CategoryBreakdown {
    pub fn share(&self, category: Category) -> CategoryShare {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or(CategoryShare {
                count: 0,
                percentage: 0.0,
            })
    }
}

/// Statistics for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    pub percentage: f64,
    pub naming: NamingStats,
    /// URLs per host, for spotting cross-domain entries
    pub hosts: BTreeMap<String, usize>,
}

/// Everything the analyzer derives from a categorized URL set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub total_urls: usize,
    pub categories: BTreeMap<Category, CategoryStats>,
    /// Normalized forms seen more than once across the crawl
    pub duplicates: BTreeSet<String>,
}

impl PatternReport {
    pub fn category(&self, category: Category) -> Option<&CategoryStats> {
        self.categories.get(&category)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

/// Counts every category and its share of `all_urls`
pub fn count_and_percentage(set: &CategorizedUrlSet) -> CategoryBreakdown {
    let total = set.len();
    let categories = Category::ALL
        .iter()
        .map(|category| {
            let count = set.count(*category);
            (
                *category,
                CategoryShare {
                    count,
                    percentage: percentage(count, total),
                },
            )
        })
        .collect();

    CategoryBreakdown { total, categories }
}

/// Returns the normalized URLs that occur more than once
///
/// URLs are normalized by dropping query string and fragment; comparison is
/// otherwise exact. Each duplicate is reported once regardless of how many
/// times it was seen.
///
/// # Example
///
/// ```
/// use sitemap_scout::analysis::detect_duplicates;
///
/// let dups = detect_duplicates([
///     "https://shop.example.com/products/a",
///     "https://shop.example.com/products/a?variant=1",
///     "https://shop.example.com/collections/x",
/// ]);
/// assert_eq!(dups.len(), 1);
/// assert!(dups.contains("https://shop.example.com/products/a"));
/// ```
pub fn detect_duplicates<'a, I>(urls: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<&'a str, usize> = HashMap::new();
    for url in urls {
        *seen.entry(normalize_for_dedup(url)).or_insert(0) += 1;
    }

    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(url, _)| url.to_string())
        .collect()
}

/// Counts URLs per lower-cased host; unparseable URLs are skipped
pub fn host_distribution<'a, I>(urls: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hosts = BTreeMap::new();
    for host in urls.into_iter().filter_map(extract_host) {
        *hosts.entry(host).or_insert(0) += 1;
    }
    hosts
}

/// Builds the pattern report for a categorized URL set
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer;

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Runs every analysis over `set`
    pub fn analyze(&self, set: &CategorizedUrlSet) -> PatternReport {
        let breakdown = count_and_percentage(set);

        let categories = Category::ALL
            .iter()
            .map(|category| {
                let urls = set.urls(*category);
                let share = breakdown.share(*category);
                let stats = CategoryStats {
                    count: share.count,
                    percentage: share.percentage,
                    naming: naming_patterns(urls.iter().map(|r| r.url.as_str())),
                    hosts: host_distribution(urls.iter().map(|r| r.url.as_str())),
                };
                (*category, stats)
            })
            .collect();

        PatternReport {
            total_urls: breakdown.total,
            categories,
            duplicates: detect_duplicates(set.all_urls.iter().map(|r| r.url.as_str())),
        }
    }
}
