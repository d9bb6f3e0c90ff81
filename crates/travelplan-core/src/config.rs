//! Application configuration management.
//!
//! This module resolves the API base URL and loads/saves the config file,
//! which holds an optional base URL override, the last email used to log in
//! and the preferred token storage backend.
//!
//! Configuration is stored at `~/.config/travelplan/config.json`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "travelplan";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "TRAVELPLAN_API_URL";

/// Used when neither a flag, the environment nor the config file names a base URL
pub const DEFAULT_API_URL: &str = "https://travelplan.us-east-1.elasticbeanstalk.com";

/// Network origin prefixed to every relative API path.
///
/// Resolved once; the client keeps it for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Arc<str>);

impl BaseUrl {
    pub fn new(url: &str) -> Self {
        Self(Arc::from(url.trim().trim_end_matches('/')))
    }

    /// Resolve from an explicit override, then `TRAVELPLAN_API_URL`, then the
    /// config file, then `DEFAULT_API_URL`.
    pub fn resolve(explicit: Option<&str>, config: &Config) -> Self {
        let env = std::env::var(API_URL_ENV).ok();
        Self::resolve_from(explicit, env.as_deref(), config.api_url.as_deref())
    }

    /// Precedence rules without touching the process environment.
    pub fn resolve_from(explicit: Option<&str>, env: Option<&str>, file: Option<&str>) -> Self {
        let url = [explicit, env, file]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self::new(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a path onto the base, inserting exactly one `/`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the session token is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// JSON key-value file in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only
    Memory,
}

impl FromStr for TokenBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown token backend '{}' (expected file, keyring or memory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_email: Option<String>,
    #[serde(default)]
    pub token_backend: TokenBackend,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
