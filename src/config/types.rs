use crate::auth::Credentials;
use crate::classify::{Category, CategoryRule};
use crate::crawler::{CrawlSettings, FetchSettings, DEFAULT_USER_AGENT};
use crate::output::ReportFormat;
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sitemap-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    /// Bot-access signature material; absent means unauthenticated requests
    #[serde(default)]
    pub credentials: Option<Credentials>,

    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<UserAgentConfig>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Extra categorization rules, tried before the built-in table
    #[serde(rename = "category-rule", default)]
    pub category_rules: Vec<CategoryRuleConfig>,
}

/// The site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site root, e.g. `https://shop.example.com`
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of sitemap fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Extra attempts after a transport failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Whole-session timeout (seconds); 0 disables it
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
            request_timeout_secs: 30,
            max_retries: 1,
            retry_delay_ms: 500,
            crawl_timeout_secs: 0,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that exported reports are written to
    pub directory: PathBuf,

    /// Report formats to write
    pub formats: Vec<ReportFormat>,

    /// Optional log file receiving a copy of every log line
    #[serde(rename = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            formats: vec![ReportFormat::Json, ReportFormat::Csv, ReportFormat::Text],
            log_file: None,
        }
    }
}

/// A `[[category-rule]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRuleConfig {
    /// Category name, e.g. `products` or `cart_checkout`
    pub category: String,

    /// Regular expression tested against the lower-cased URL path
    pub pattern: String,
}

impl CategoryRuleConfig {
    /// Compiles this entry into a categorizer rule
    pub fn to_rule(&self) -> Result<CategoryRule, ConfigError> {
        let category: Category = self
            .category
            .parse()
            .map_err(ConfigError::InvalidPattern)?;

        CategoryRule::pattern(category, &self.pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("pattern '{}' does not compile: {}", self.pattern, e))
        })
    }
}

impl Config {
    /// Returns the credentials to present, if any
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.clone()
    }

    /// Returns the `User-Agent` header value
    pub fn user_agent(&self) -> String {
        self.user_agent
            .as_ref()
            .map(UserAgentConfig::header_value)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    /// Whole-session timeout, if configured
    pub fn crawl_timeout(&self) -> Option<Duration> {
        match self.crawler.crawl_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Converts the configuration into coordinator settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if a category rule names an
    /// unknown category or its regex does not compile.
    pub fn crawl_settings(&self) -> Result<CrawlSettings, ConfigError> {
        let extra_rules = self
            .category_rules
            .iter()
            .map(CategoryRuleConfig::to_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CrawlSettings {
            fetch: FetchSettings {
                user_agent: self.user_agent(),
                request_timeout: Duration::from_secs(self.crawler.request_timeout_secs),
                max_retries: self.crawler.max_retries,
                retry_delay: Duration::from_millis(self.crawler.retry_delay_ms),
            },
            max_concurrent_fetches: self.crawler.max_concurrent_fetches as usize,
            extra_rules,
        })
    }
}
