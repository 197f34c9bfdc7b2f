//! Reading configuration files
//!
//! A file is read once; the same bytes are parsed, validated and hashed, so
//! the hash recorded in a report always matches the configuration that
//! produced it.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses and validates configuration text
///
/// Category rules are compiled as part of validation, so a config that
/// passes here always converts into crawl settings.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of configuration text
pub fn config_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Loads, parses and validates a configuration file
///
/// # Errors
///
/// * `ConfigError::Io` - the file could not be read
/// * `ConfigError::Parse` - the file is not valid TOML for [`Config`]
/// * `ConfigError::Validation` / `InvalidUrl` / `InvalidPattern` - a value is
///   out of range or malformed
///
/// # Example
///
/// ```no_run
/// use sitemap_scout::config::load_config;
/// use std::path::Path;
///
/// # fn main() -> Result<(), sitemap_scout::ConfigError> {
/// let config = load_config(Path::new("scout.toml"))?;
/// println!("Crawling {}", config.site.base_url);
/// # Ok(())
/// # }
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Loads a configuration file and returns it with the hash of its content
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, config_hash(&content)))
}
