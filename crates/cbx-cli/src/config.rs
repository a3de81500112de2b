//! Application settings.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Exchange REST base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Trading pair this client operates on exclusively.
    #[serde(default = "default_product_id")]
    pub product_id: String,
    /// Credential file: JSON with API_KEY, API_SECRET and API_PASS.
    #[serde(default = "default_auth_file")]
    pub auth_file: PathBuf,
    /// Delay between order-watch polls (seconds).
    #[serde(default = "default_order_poll_secs")]
    pub order_poll_secs: u64,
    /// Delay between live-ticker polls (milliseconds). 0 polls with no
    /// delay, which will run into rate limits on a real deployment.
    #[serde(default)]
    pub ticker_poll_ms: u64,
}

fn default_api_url() -> String {
    "https://api.gdax.com/".to_string()
}

fn default_product_id() -> String {
    "BTC-USD".to_string()
}

fn default_auth_file() -> PathBuf {
    PathBuf::from("auth.json")
}

fn default_order_poll_secs() -> u64 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            product_id: default_product_id(),
            auth_file: default_auth_file(),
            order_poll_secs: default_order_poll_secs(),
            ticker_poll_ms: 0,
        }
    }
}

impl Settings {
    /// Load settings: `CBX_CONFIG` env var, then `./cbx.toml`, else defaults.
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("CBX_CONFIG").unwrap_or_else(|_| "cbx.toml".to_string());

        if Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path, "settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
