//! Path matching rules
//!
//! Rules are tested against the lower-cased path of a URL. The default table
//! is a plain ordered list; the first rule that matches decides the category.

use crate::classify::Category;
use regex::Regex;

/// A single test applied to a lower-cased URL path
#[derive(Debug, Clone)]
pub enum PathRule {
    /// Path contains the fragment anywhere
    Contains(&'static str),
    /// Path starts with the fragment
    Prefix(&'static str),
    /// Path equals the fragment
    Exact(&'static str),
    /// Path is empty or `/`
    Root,
    /// Caller-supplied regular expression
    Pattern(Regex),
}

impl PathRule {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Contains(fragment) => path.contains(fragment),
            Self::Prefix(fragment) => path.starts_with(fragment),
            Self::Exact(fragment) => path == *fragment,
            Self::Root => path.is_empty() || path == "/",
            Self::Pattern(regex) => regex.is_match(path),
        }
    }
}

/// A rule together with the category it assigns
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub rule: PathRule,
}

impl CategoryRule {
    pub fn new(category: Category, rule: PathRule) -> Self {
        Self { category, rule }
    }

    /// Builds a regex rule
    ///
    /// # Errors
    ///
    /// Returns the regex compile error if `pattern` is invalid.
    pub fn pattern(category: Category, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(category, PathRule::Pattern(Regex::new(pattern)?)))
    }
}

/// Returns the built-in rule table
///
/// Order matters: products are claimed before collections, so
/// `/collections/summer/products/hat` is a product.
pub fn default_rules() -> Vec<CategoryRule> {
    use Category::*;
    use PathRule::*;

    let table: [(Category, &[PathRule]); 7] = [
        (
            Products,
            &[
                Contains("/products/"),
                Contains("/product/"),
                Contains("/p/"),
                Contains("/item/"),
            ],
        ),
        (
            Collections,
            &[
                Contains("/collections/"),
                Contains("/collection/"),
                Contains("/categories/"),
                Contains("/category/"),
                Contains("/shop/"),
                Contains("/browse/"),
            ],
        ),
        (
            Blogs,
            &[
                Contains("/blogs/"),
                Contains("/blog/"),
                Contains("/news/"),
                Contains("/articles/"),
                Contains("/journal/"),
            ],
        ),
        (
            Pages,
            &[
                Contains("/pages/"),
                Contains("/page/"),
                Contains("/about"),
                Contains("/contact"),
                Contains("/privacy"),
                Contains("/terms"),
                Contains("/shipping"),
                Contains("/returns"),
                Contains("/faq"),
                Contains("/help"),
                Contains("/support"),
            ],
        ),
        (
            CartCheckout,
            &[
                Contains("/cart"),
                Contains("/checkout"),
                Contains("/account"),
                Contains("/checkouts/"),
                Contains("/orders/"),
            ],
        ),
        (Search, &[Contains("/search"), Contains("/find")]),
        (Home, &[Root, Prefix("/index")]),
    ];

    table
        .into_iter()
        .flat_map(|(category, rules)| {
            rules
                .iter()
                .cloned()
                .map(move |rule| CategoryRule::new(category, rule))
        })
        .collect()
}
