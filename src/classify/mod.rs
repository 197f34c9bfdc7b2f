//! Classification module for discovered URLs
//!
//! - `Category`: the closed set of URL categories
//! - `PathRule` / `CategoryRule`: the ordered rule table
//! - `Categorizer`: first-match-wins assignment of URLs to categories

mod categorizer;
mod category;
mod rules;

pub use categorizer::{CategorizedUrlSet, Categorizer};
pub use category::Category;
pub use rules::{default_rules, CategoryRule, PathRule};
