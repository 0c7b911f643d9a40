//! Configuration loading for kagi-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable KAGI_API_KEY (required, credential only)
//! 2. Environment variables KAGI_BASE_URL / KAGI_HTTP_TIMEOUT_SECS
//! 3. KAGI_MCP_CONFIG_PATH or ~/.config/kagi-mcp.toml
//! 4. Default values
//!
//! The API key is only ever read from the environment, never from the
//! config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::Error;

/// Main configuration structure
#[derive(Clone)]
pub struct Config {
    /// The Kagi API credential, immutable after load
    pub api_key: String,
    /// API endpoint configuration
    pub api: ApiConfig,
}

/// Kagi API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Kagi API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (none = wait for the transport)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// File-level configuration (everything except the credential)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api: ApiConfig,
}

fn default_base_url() -> String {
    "https://kagi.com/api/v0".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

// Keep the credential out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api", &self.api)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment and optional config file.
    ///
    /// A missing or empty `KAGI_API_KEY` is fatal.
    pub fn load() -> Result<Self, Error> {
        let mut api = Self::load_file_layer()?;

        // Environment overrides (highest priority)
        if let Ok(url) = std::env::var("KAGI_BASE_URL") {
            api.base_url = url;
        }
        if let Ok(secs) = std::env::var("KAGI_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!(
                    "KAGI_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            api.timeout_seconds = Some(secs);
        }

        let api_key = std::env::var("KAGI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;

        Ok(Self { api_key, api })
    }

    fn load_file_layer() -> Result<ApiConfig, Error> {
        let Some(path) = Self::find_config_path() else {
            tracing::info!("No config path available, using defaults");
            return Ok(ApiConfig::default());
        };

        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(ApiConfig::default());
        }

        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        Ok(file.api)
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("KAGI_MCP_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.config/kagi-mcp.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".config").join("kagi-mcp.toml");
            return Some(path);
        }

        None
    }
}
