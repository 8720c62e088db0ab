//! Settings file management

use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;

/// Client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Status polling configuration
    #[serde(default)]
    pub polling: PollingSettings,

    /// Terminal output configuration
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Apply `SEED_BACKEND_URL` and `SEED_LOG_LEVEL` on top of the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SEED_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
        if let Ok(level) = std::env::var("SEED_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.log_level = level,
                Err(e) => tracing::warn!("Ignoring SEED_LOG_LEVEL: {}", e),
            }
        }
        self
    }
}

fn default_true() -> bool {
    true
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Seconds between two status fetches
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// How long a forced poll keeps running after a build or HTTPS request
    #[serde(default = "default_forced_window_secs")]
    pub forced_window_secs: u64,
}

fn default_interval_secs() -> u64 {
    3
}

fn default_forced_window_secs() -> u64 {
    60
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            forced_window_secs: default_forced_window_secs(),
        }
    }
}

/// Terminal output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { color: true }
    }
}
