//! API models

use serde::{Deserialize, Serialize};

pub mod build;
pub mod project;
pub mod registry;
pub mod report;
pub mod user;

pub use build::*;
pub use project::*;
pub use registry::*;
pub use report::*;
pub use user::*;

/// Standard response envelope used by most backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default)]
    pub message: String,

    /// Absent on endpoints that answer with `ApiResponse<Void>`
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }
}

/// Offset page as produced by Spring Data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub last: bool,
}
