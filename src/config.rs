// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for catsearch
//!
//! Loads configuration from .catsearchrc.toml in current directory or ~/.config/catsearch/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::HttpConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const API_URL_ENV: &str = "CATSEARCH_API_URL";
const TOKEN_ENV: &str = "CATSEARCH_TOKEN";

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration loaded from .catsearchrc.toml or ~/.config/catsearch/config.toml
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog API base URL, including the version prefix
    pub api_url: Option<String>,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Entries per result page
    pub page_size: Option<u32>,
    /// Maximum autocomplete suggestions
    pub suggestion_limit: Option<usize>,
    /// Number of history records to fetch
    pub history_limit: Option<u32>,
    /// Quiet period before a typed query settles
    pub debounce_ms: Option<u64>,
    /// Delay before the suggestion list closes after losing focus
    pub blur_grace_ms: Option<u64>,
    /// Maximum characters of an AI summary shown in result lists
    pub summary_preview_chars: Option<usize>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from files, then apply environment overrides
    ///
    /// Precedence (highest to lowest):
    /// 1. CATSEARCH_API_URL / CATSEARCH_TOKEN environment variables
    /// 2. .catsearchrc.toml in current directory
    /// 3. ~/.config/catsearch/config.toml
    pub fn load() -> Self {
        let mut config = Self::load_files();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_files() -> Self {
        // Try current directory first
        if let Some(config) = Self::load_from_path(Path::new(".catsearchrc.toml")) {
            return config;
        }

        // Try home directory config
        if let Some(config_path) = user_config_path() {
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format.as_ref().and_then(|s| match s.to_lowercase().as_str() {
            "json" => Some(ConfigOutputFormat::Json),
            "text" => Some(ConfigOutputFormat::Text),
            _ => None,
        })
    }

    /// Merge CLI connection options with config (CLI wins)
    pub fn merge_http(&self, cli_api_url: Option<&str>, cli_token: Option<&str>) -> HttpConfig {
        HttpConfig {
            base_url: cli_api_url
                .map(str::to_string)
                .or_else(|| self.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: cli_token.map(str::to_string).or_else(|| self.token.clone()),
        }
    }

    /// Merge CLI page size with config (CLI wins)
    pub fn merge_page_size(&self, cli_value: Option<u32>) -> u32 {
        cli_value
            .or(self.page_size)
            .unwrap_or(SearchSettings::default().page_size)
            .clamp(1, 100)
    }

    /// Merge CLI history limit with config (CLI wins)
    pub fn merge_history_limit(&self, cli_value: Option<u32>) -> u32 {
        cli_value
            .or(self.history_limit)
            .unwrap_or(SearchSettings::default().history_limit)
            .clamp(1, 100)
    }

    /// Resolve typed search settings, filling unset keys with defaults
    pub fn search_settings(&self) -> SearchSettings {
        let defaults = SearchSettings::default();
        SearchSettings {
            page_size: self.merge_page_size(None),
            suggestion_limit: self
                .suggestion_limit
                .unwrap_or(defaults.suggestion_limit)
                .clamp(1, 20),
            history_limit: self.merge_history_limit(None),
            debounce: self
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            blur_grace: self
                .blur_grace_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.blur_grace),
            summary_preview_chars: self
                .summary_preview_chars
                .unwrap_or(defaults.summary_preview_chars),
        }
    }
}

/// Resolved settings handed to the search layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub page_size: u32,
    pub suggestion_limit: usize,
    pub history_limit: u32,
    pub debounce: Duration,
    pub blur_grace: Duration,
    pub summary_preview_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            suggestion_limit: 10,
            history_limit: 20,
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
            summary_preview_chars: 150,
        }
    }
}

/// Path of the per-user config file, if a home directory is known
fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("catsearch").join("config.toml"))
}
