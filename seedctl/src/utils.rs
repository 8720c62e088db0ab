//! Utility functions

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Version information for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Parse a backend timestamp.
///
/// RFC 3339 values keep their own offset; zone-less values (the backend's
/// `LocalDateTime`) are taken as given.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Format a timestamp as `MM.DD HH:MM:SS`.
///
/// `2025-05-01T14:32:10Z` becomes `05.01 14:32:10`.
pub fn format_date_time(value: &str) -> Option<String> {
    parse_timestamp(value).map(|dt| dt.format("%m.%d %H:%M:%S").to_string())
}

/// Format a timestamp as `HH:MM:SS`
pub fn format_hhmmss(value: &str) -> Option<String> {
    parse_timestamp(value).map(|dt| dt.format("%H:%M:%S").to_string())
}

/// Extract the repository name from its clone URL, without the `.git` suffix
pub fn parse_repo_name(repo_url: &str) -> String {
    let trimmed = repo_url
        .strip_suffix(".git/")
        .or_else(|| repo_url.strip_suffix(".git"))
        .unwrap_or(repo_url);
    trimmed.rsplit('/').next().unwrap_or_default().to_string()
}

/// File name of a server-side path, as shown for uploaded files
pub fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}
