//! Console Configuration
//!
//! Defaults, overridden by build-time environment, overridden by whatever the
//! host page supplies at runtime (see the UI's `config` module).

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CACHE_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: String,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub log_level: String,
    /// Cached reads kept before unreferenced ones are collected
    pub cache_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }
}

impl ConsoleConfig {
    /// Defaults plus `CONSOLE_API_BASE` / `CONSOLE_LOG_LEVEL` captured at build time
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("CONSOLE_API_BASE"),
            option_env!("CONSOLE_LOG_LEVEL"),
        )
    }

    /// Parse a JSON config document; missing keys keep their defaults
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace values with any non-blank override
    pub fn with_overrides(mut self, api_base_url: Option<&str>, log_level: Option<&str>) -> Self {
        if let Some(url) = api_base_url.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_base_url = url.to_string();
        }
        if let Some(level) = log_level.map(str::trim).filter(|s| !s.is_empty()) {
            self.log_level = level.to_string();
        }
        self
    }

    /// Unknown levels fall back to `info`
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::Info)
    }
}
