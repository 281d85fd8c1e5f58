//! Configuration management for artcat using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::CatalogError;

/// Fixed number of records per catalog page.
pub const PAGE_SIZE: usize = 12;

/// Environment variable holding the catalog base URL.
pub const BASE_URL_ENV: &str = "ARTCAT_BASE_FETCH_URL";

/// Catalog endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1/artworks";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Catalog endpoint; the page number is appended as `?page=<n>`.
    pub base_url: String,
    /// User agent sent with every request. None means `artcat/<version>`.
    pub user_agent: Option<String>,
    /// Request timeout in seconds. None means requests never time out.
    pub request_timeout: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            request_timeout: None,
        }
    }
}

impl Settings {
    /// Parse and validate the configured base URL.
    pub fn base_url(&self) -> Result<Url, CatalogError> {
        Url::parse(&self.base_url).map_err(|e| CatalogError::InvalidUrl {
            url: self.base_url.clone(),
            source: e,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// Where the interactive browser writes its log file.
    pub fn log_path(&self) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("artcat")
            .join("artcat.log")
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers artcat config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("artcat").await {
            Ok(pref_config) => {
                let base_url: Option<String> = pref_config.get("base_url").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();

                Config {
                    base_url,
                    user_agent,
                    request_timeout,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
    }
}

/// Overrides taken from the environment and the command line.
/// Later layers win: file config, then environment, then flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout: Option<u64>,
}

impl Overrides {
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
    }
}

/// Load settings from the config file, `.env`, and the given overrides.
pub async fn load_settings(overrides: &Overrides) -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);

    // .env is optional; the process environment still applies without it
    let _ = dotenvy::dotenv();
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            settings.base_url = base_url;
        }
    }

    overrides.apply_to_settings(&mut settings);
    settings
}
