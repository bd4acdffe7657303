//! Configuration management.
//!
//! Settings come from an optional TOML file with environment variable
//! overrides. The file is discovered at `./rxiv-scout.toml` or
//! `<config dir>/rxiv-scout/config.toml`.
//!
//! ```toml
//! [api]
//! biorxiv_url = "https://api.biorxiv.org"
//! medrxiv_url = "https://api.medrxiv.org"
//! timeout_secs = 30
//! retry_max_attempts = 3
//! retry_initial_delay_ms = 1000
//!
//! [search]
//! default_limit = 10
//!
//! [assets]
//! directory = "./assets"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rxiv::{BIORXIV_API_URL, MEDRXIV_API_URL};
use crate::utils::RetryConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Static asset index settings
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the primary collection
    #[serde(default = "default_biorxiv_url")]
    pub biorxiv_url: String,

    /// Base URL for the secondary collection
    #[serde(default = "default_medrxiv_url")]
    pub medrxiv_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            biorxiv_url: default_biorxiv_url(),
            medrxiv_url: default_medrxiv_url(),
            timeout_secs: default_timeout_secs(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
        }
    }
}

impl ApiConfig {
    /// Retry settings as the executor consumes them.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_max_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            ..RetryConfig::default()
        }
    }
}

fn default_biorxiv_url() -> String {
    BIORXIV_API_URL.to_string()
}

fn default_medrxiv_url() -> String {
    MEDRXIV_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_initial_delay_ms() -> u64 {
    1000
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results returned when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    crate::models::DEFAULT_LIMIT
}

/// Static asset index settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory scanned for assets; unset disables the index
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&raw)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Default configuration with environment overrides applied.
pub fn env_config() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}

/// Look for a config file in the usual places.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("rxiv-scout.toml");
    if local.is_file() {
        return Some(local);
    }

    let global = dirs::config_dir()?.join("rxiv-scout").join("config.toml");
    global.is_file().then_some(global)
}

/// `RXIV_SCOUT_*` environment variables override file values.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var("RXIV_SCOUT_BIORXIV_URL") {
        config.api.biorxiv_url = url;
    }
    if let Ok(url) = std::env::var("RXIV_SCOUT_MEDRXIV_URL") {
        config.api.medrxiv_url = url;
    }
    if let Ok(secs) = std::env::var("RXIV_SCOUT_TIMEOUT_SECS") {
        if let Ok(secs) = secs.parse() {
            config.api.timeout_secs = secs;
        }
    }
    if let Ok(dir) = std::env::var("RXIV_SCOUT_ASSETS_DIR") {
        config.assets.directory = Some(PathBuf::from(dir));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.biorxiv_url, BIORXIV_API_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.retry_max_attempts, 3);
        assert_eq!(config.search.default_limit, 10);
        assert!(config.assets.directory.is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [api]
            timeout_secs = 10

            [assets]
            directory = "./fixtures"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.medrxiv_url, MEDRXIV_API_URL);
        assert_eq!(
            config.assets.directory.as_deref(),
            Some(Path::new("./fixtures"))
        );
    }

    #[test]
    fn test_retry_config_conversion() {
        let api = ApiConfig {
            retry_max_attempts: 5,
            retry_initial_delay_ms: 250,
            ..ApiConfig::default()
        };
        let retry = api.retry_config();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay, Duration::from_millis(250));
    }
}
