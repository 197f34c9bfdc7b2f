//! URL categorization

use crate::classify::rules::{default_rules, CategoryRule};
use crate::classify::Category;
use crate::crawler::UrlRecord;
use crate::url::extract_path;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every discovered URL, plus the same URLs partitioned by category
///
/// Serializes as one flat object: `all_urls` next to the eight category
/// keys, every key present even when its list is empty.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedUrlSet {
    pub all_urls: Vec<UrlRecord>,

    #[serde(flatten)]
    pub by_category: BTreeMap<Category, Vec<UrlRecord>>,
}

impl CategorizedUrlSet {
    /// Creates an empty set with every category key present
    pub fn new() -> Self {
        Self {
            all_urls: Vec::new(),
            by_category: Category::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
        }
    }

    /// Adds a record to `all_urls` and to its category list
    pub fn insert(&mut self, category: Category, record: UrlRecord) {
        self.by_category
            .entry(category)
            .or_default()
            .push(record.clone());
        self.all_urls.push(record);
    }

    /// Returns the records of one category, in discovery order
    pub fn urls(&self, category: Category) -> &[UrlRecord] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.urls(category).len()
    }

    pub fn len(&self) -> usize {
        self.all_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_urls.is_empty()
    }
}

impl Default for CategorizedUrlSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns URLs to categories using an ordered rule table
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Creates a categorizer with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Creates a categorizer whose `extra` rules are tried before the
    /// built-in ones
    pub fn with_extra_rules(extra: Vec<CategoryRule>) -> Self {
        let mut rules = extra;
        rules.extend(default_rules());
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns the category of a URL
    ///
    /// The lower-cased path is tested against each rule in order and the
    /// first match wins. A URL no rule claims is `Others`. Never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_scout::{Categorizer, Category};
    ///
    /// let categorizer = Categorizer::new();
    /// assert_eq!(
    ///     categorizer.categorize("https://shop.example.com/products/red-shoe"),
    ///     Category::Products
    /// );
    /// assert_eq!(categorizer.categorize("https://shop.example.com/"), Category::Home);
    /// assert_eq!(categorizer.categorize("not a url"), Category::Others);
    /// ```
    pub fn categorize(&self, url: &str) -> Category {
        let path = extract_path(url).to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.rule.matches(&path))
            .map(|rule| rule.category)
            .unwrap_or(Category::Others)
    }

    /// Categorizes every record, keeping input order within each list
    pub fn categorize_all(&self, records: Vec<UrlRecord>) -> CategorizedUrlSet {
        let mut set = CategorizedUrlSet::new();
        for record in records {
            let category = self.categorize(&record.url);
            set.insert(category, record);
        }
        set
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}
