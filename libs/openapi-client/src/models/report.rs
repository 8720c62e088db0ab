//! AI build-failure report models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Success,
    Fail,
    Rejected,
}

/// Report list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReport {
    pub id: u64,
    #[serde(default)]
    pub build_number: Option<u64>,
    pub title: String,
    pub status: ReportStatus,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiReportList {
    pub reports: Vec<AiReport>,
}

/// Full report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReportDetail {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub files: Vec<String>,
    pub status: ReportStatus,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub commit_url: Option<String>,
    /// Only present for successful reports
    #[serde(default)]
    pub merge_request_url: Option<String>,
}
