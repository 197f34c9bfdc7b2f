/// URL category definitions
///
/// The category set is closed: every URL lands in exactly one of these, with
/// `Others` catching whatever no rule claims.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which part of a site a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Products,
    Collections,
    Blogs,
    Pages,
    CartCheckout,
    Search,
    Home,
    Others,
}

impl Category {
    /// Every category, in rule order with `Others` last
    pub const ALL: [Category; 8] = [
        Self::Products,
        Self::Collections,
        Self::Blogs,
        Self::Pages,
        Self::CartCheckout,
        Self::Search,
        Self::Home,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Collections => "collections",
            Self::Blogs => "blogs",
            Self::Pages => "pages",
            Self::CartCheckout => "cart_checkout",
            Self::Search => "search",
            Self::Home => "home",
            Self::Others => "others",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Collections => "Collections",
            Self::Blogs => "Blogs",
            Self::Pages => "Pages",
            Self::CartCheckout => "Cart/Checkout",
            Self::Search => "Search",
            Self::Home => "Home",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}
