//! Deployment status codes reported by the backend

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which phase of the pipeline a status belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Build,
    Https,
    Ai,
}

/// Display metadata for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub message: &'static str,
    pub progress: u8,
    pub category: StatusCategory,
    /// Polling stops once a terminal status is seen
    pub terminal: bool,
}

/// Server status as reported by `GET /projects/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    // Build pipeline
    Init,
    SetSwapMemory,
    UpdatePackage,
    InstallJdk,
    InstallDocker,
    RunApplication,
    InstallNginx,
    InstallJenkins,
    InstallJenkinsPlugins,
    SetJenkinsInfo,
    CreateJenkinsJob,
    CreateJenkinsfile,
    CreateFrontendDockerfile,
    CreateBackendDockerfile,
    CreateWebhook,
    Finish,
    Fail,

    // HTTPS conversion
    FinishConvertHttps,

    // AI-assisted fix
    JenkinsBuildLog,
    CollectingAppInfo,
    InferingErrorSource,
    CollectingLogsAndTrees,
    SuspectFile,
    GetOriginalCode,
    GetInstruction,
    GetFixedCode,
    CommittingFixes,
    JenkinsRebuilding,
    RebuildSuccess,
    RebuildFail,
    CreatingReport,
    CreatePullRequest,
    SavingReport,
    FinishWithAi,
    /// The backend's wire spelling
    #[serde(rename = "FAIL_WTIH_AI")]
    FailWithAi,
    BuildFailWithAi,
    CompletedSuccessfully,
    CompletedWithErrors,

    #[serde(other)]
    Unknown,
}

const fn info(
    message: &'static str,
    progress: u8,
    category: StatusCategory,
    terminal: bool,
) -> StatusInfo {
    StatusInfo {
        message,
        progress,
        category,
        terminal,
    }
}

impl ServerStatus {
    /// The single source of display and polling metadata
    pub const fn info(self) -> StatusInfo {
        use StatusCategory::{Ai, Build, Https};
        use ServerStatus::*;

        match self {
            Init => info("Run the server setup to start", 0, Build, true),
            SetSwapMemory => info("Configuring swap memory", 5, Build, false),
            UpdatePackage => info("Updating system packages", 10, Build, false),
            InstallJdk => info("Installing the JDK", 20, Build, false),
            InstallDocker => info("Installing Docker", 30, Build, false),
            RunApplication => info("Starting application containers", 35, Build, false),
            InstallNginx => info("Installing Nginx", 40, Build, false),
            InstallJenkins => info("Installing Jenkins", 50, Build, false),
            InstallJenkinsPlugins => info("Installing Jenkins plugins", 60, Build, false),
            SetJenkinsInfo => info("Configuring Jenkins", 65, Build, false),
            CreateJenkinsJob => info("Creating the Jenkins job", 70, Build, false),
            CreateJenkinsfile => info("Writing the Jenkinsfile", 75, Build, false),
            CreateFrontendDockerfile => info("Writing the frontend Dockerfile", 80, Build, false),
            CreateBackendDockerfile => info("Writing the backend Dockerfile", 85, Build, false),
            CreateWebhook => info("Registering the GitLab webhook", 90, Build, false),
            Finish => info("Server setup finished", 100, Build, true),
            Fail => info("Server setup failed", 0, Build, true),

            FinishConvertHttps => info("HTTPS conversion finished", 100, Https, true),

            JenkinsBuildLog => info("Reading the Jenkins build log", 5, Ai, false),
            CollectingAppInfo => info("Collecting application info and Git changes", 10, Ai, false),
            InferingErrorSource => info("Inferring the error source", 15, Ai, false),
            CollectingLogsAndTrees => info("Collecting logs and file trees", 20, Ai, false),
            SuspectFile => info("Inferring the file at fault", 30, Ai, false),
            GetOriginalCode => info("Fetching the original code", 35, Ai, false),
            GetInstruction => info("Generating fix instructions", 45, Ai, false),
            GetFixedCode => info("Generating fixed code", 55, Ai, false),
            CommittingFixes => info("Committing fixes", 65, Ai, false),
            JenkinsRebuilding => info("Rebuilding on Jenkins", 75, Ai, false),
            RebuildSuccess => info("Build succeeded after AI fix", 80, Ai, false),
            RebuildFail => info("Build failed after AI fix", 80, Ai, false),
            CreatingReport => info("Writing the report", 85, Ai, false),
            CreatePullRequest => info("Opening a merge request", 90, Ai, false),
            SavingReport => info("Saving the report", 95, Ai, false),
            FinishWithAi => info("AI fix and deployment finished", 100, Ai, true),
            FailWithAi => info("AI fix finished, deployment failed", 100, Ai, true),
            BuildFailWithAi => info("AI fix aborted with an error", 0, Ai, true),
            CompletedSuccessfully => info("Completed successfully", 100, Ai, true),
            CompletedWithErrors => info("Completed with errors", 100, Ai, true),

            Unknown => info("Unknown status", 0, Build, false),
        }
    }

    /// Parse a wire code, mapping anything unrecognized to `Unknown`
    pub fn from_code(code: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(code.to_string()))
            .unwrap_or(ServerStatus::Unknown)
    }

    pub fn is_terminal(self) -> bool {
        self.info().terminal
    }

    /// A build is running: a build-phase status other than idle or finished
    pub fn is_build_loading(self) -> bool {
        self.info().category == StatusCategory::Build
            && !matches!(
                self,
                ServerStatus::Init
                    | ServerStatus::Finish
                    | ServerStatus::Fail
                    | ServerStatus::FinishConvertHttps
                    | ServerStatus::Unknown
            )
    }

    /// An HTTPS conversion is running
    pub fn is_https_loading(self) -> bool {
        self.info().category == StatusCategory::Https && self != ServerStatus::FinishConvertHttps
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().message)
    }
}

/// A polled status together with the server liveness flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: ServerStatus,
    /// Raw code as received, kept for codes the client does not know
    pub code: String,
    pub is_server_live: bool,
}

impl From<openapi_client::models::ProjectServerStatus> for StatusReport {
    fn from(value: openapi_client::models::ProjectServerStatus) -> Self {
        Self {
            status: ServerStatus::from_code(&value.server_status),
            code: value.server_status,
            is_server_live: value.is_server_live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_set() {
        let terminal = [
            "INIT",
            "FINISH",
            "FAIL",
            "FINISH_WITH_AI",
            "FAIL_WTIH_AI",
            "BUILD_FAIL_WITH_AI",
            "FINISH_CONVERT_HTTPS",
            "COMPLETED_SUCCESSFULLY",
            "COMPLETED_WITH_ERRORS",
        ];
        for code in terminal {
            assert!(ServerStatus::from_code(code).is_terminal(), "{code}");
        }

        assert!(!ServerStatus::from_code("INSTALL_DOCKER").is_terminal());
        assert!(!ServerStatus::from_code("JENKINS_REBUILDING").is_terminal());
        assert!(!ServerStatus::from_code("SOMETHING_NEW").is_terminal());
    }

    #[test]
    fn test_unknown_code() {
        let status = ServerStatus::from_code("SOMETHING_NEW");
        assert_eq!(status, ServerStatus::Unknown);
        assert!(!status.is_build_loading());
        assert!(!status.is_https_loading());
    }

    #[test]
    fn test_legacy_spelling_round_trips() {
        let status: ServerStatus = serde_json::from_str("\"FAIL_WTIH_AI\"").unwrap();
        assert_eq!(status, ServerStatus::FailWithAi);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"FAIL_WTIH_AI\"");
    }

    #[test]
    fn test_progress_and_category() {
        let info = ServerStatus::InstallJenkins.info();
        assert_eq!(info.progress, 50);
        assert_eq!(info.category, StatusCategory::Build);

        let info = ServerStatus::GetFixedCode.info();
        assert_eq!(info.progress, 55);
        assert_eq!(info.category, StatusCategory::Ai);
    }

    #[test]
    fn test_loading_flags() {
        assert!(ServerStatus::InstallDocker.is_build_loading());
        assert!(!ServerStatus::Init.is_build_loading());
        assert!(!ServerStatus::Finish.is_build_loading());
        assert!(!ServerStatus::Fail.is_build_loading());

        assert!(!ServerStatus::FinishConvertHttps.is_https_loading());
        assert!(!ServerStatus::InstallDocker.is_https_loading());
    }

    #[test]
    fn test_report_keeps_raw_code() {
        let report = StatusReport::from(openapi_client::models::ProjectServerStatus {
            server_status: "BRAND_NEW".to_string(),
            is_server_live: true,
        });
        assert_eq!(report.status, ServerStatus::Unknown);
        assert_eq!(report.code, "BRAND_NEW");
        assert!(report.is_server_live);
    }
}
