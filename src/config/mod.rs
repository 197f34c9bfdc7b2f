//! Configuration module for Sitemap-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```
//! use sitemap_scout::config::parse_config;
//!
//! let config = parse_config("[site]\nbase-url = \"https://shop.example.com\"\n").unwrap();
//! assert_eq!(config.crawler.max_concurrent_fetches, 4);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryRuleConfig, Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
