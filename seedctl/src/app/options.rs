//! Application configuration options

use std::time::Duration;

use crate::logs::LogLevel;
use crate::storage::settings::Settings;

/// Values given on the command line, which win over settings and env
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub log_level: Option<LogLevel>,
    pub json: bool,
    pub no_color: bool,
}

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    pub log_level: LogLevel,

    /// Print machine-readable JSON instead of tables
    pub json: bool,

    /// Colour terminal output
    pub color: bool,

    /// Status polling options
    pub polling: PollingOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct PollingOptions {
    pub interval: Duration,
    /// Window of a forced poll after a build or HTTPS request
    pub forced_window: Duration,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            forced_window: Duration::from_secs(60),
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::resolve(Settings::default(), Overrides::default())
    }
}

impl AppOptions {
    /// Settings file (with env overrides applied) first, then the CLI
    pub fn resolve(settings: Settings, overrides: Overrides) -> Self {
        Self {
            backend_base_url: overrides
                .backend_url
                .unwrap_or(settings.backend.base_url),
            request_timeout: Duration::from_secs(settings.backend.timeout_secs.max(1)),
            log_level: overrides.log_level.unwrap_or(settings.log_level),
            json: overrides.json,
            color: settings.output.color && !overrides.no_color,
            polling: PollingOptions {
                interval: Duration::from_secs(settings.polling.interval_secs.max(1)),
                forced_window: Duration::from_secs(settings.polling.forced_window_secs),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_wins_over_settings() {
        let mut settings = Settings::default();
        settings.backend.base_url = "https://from-file/api".to_string();
        settings.log_level = LogLevel::Info;

        let options = AppOptions::resolve(
            settings.clone(),
            Overrides {
                backend_url: Some("https://from-cli/api".to_string()),
                log_level: Some(LogLevel::Debug),
                json: true,
                no_color: true,
            },
        );
        assert_eq!(options.backend_base_url, "https://from-cli/api");
        assert_eq!(options.log_level, LogLevel::Debug);
        assert!(options.json);
        assert!(!options.color);

        let options = AppOptions::resolve(settings, Overrides::default());
        assert_eq!(options.backend_base_url, "https://from-file/api");
        assert_eq!(options.log_level, LogLevel::Info);
        assert!(options.color);
        assert_eq!(options.polling.interval, Duration::from_secs(3));
    }
}
