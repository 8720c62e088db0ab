//! Build and HTTPS log models

use serde::{Deserialize, Serialize};

/// Summary of one Jenkins build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub build_number: u32,
    pub build_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub status: String,
}

/// A page of builds, addressed by a start cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPage {
    pub builds: Vec<BuildSummary>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub next_start: Option<u32>,
}

/// Echo line captured inside a build step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoLine {
    #[serde(default)]
    pub echo_number: u32,
    pub echo_content: String,
    #[serde(default)]
    pub duration: String,
}

/// Outcome of one build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAIL", alias = "FAILED", alias = "FAILURE")]
    Fail,
    #[serde(rename = "-", other)]
    Unknown,
}

/// A single stage of a build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStep {
    pub step_number: u32,
    pub step_name: String,
    #[serde(default)]
    pub duration: String,
    pub status: StepStatus,
    #[serde(default)]
    pub echo_list: Vec<EchoLine>,
}

/// Build detail with its steps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDetail {
    pub build_number: u32,
    pub build_name: String,
    pub overall_status: String,
    #[serde(default)]
    pub step_list: Vec<BuildStep>,
}

/// One step of the HTTPS conversion log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpsLog {
    pub step_number: u32,
    pub step_name: String,
    #[serde(default)]
    pub log_content: String,
    pub status: String,
    pub created_at: String,
}
