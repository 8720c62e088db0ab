//! Project models

use serde::{Deserialize, Serialize};

/// Repository layout of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepoStructure {
    /// Frontend and backend live in one repository, split by directory
    #[default]
    Mono,
    /// Frontend and backend live on separate branches
    Multi,
}

/// Last build result shown on project cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildStatus {
    Success,
    #[serde(alias = "FAIL")]
    Failure,
}

/// Invitation state of a project member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberStatus {
    Accepted,
    Pending,
    Owner,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub user_id: u64,
    pub user_name: String,
    #[serde(default)]
    pub user_identify_id: String,
    #[serde(default)]
    pub profile_image_url: String,
    pub status: MemberStatus,
}

/// Entry of the project list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: u64,
    pub project_name: String,
    pub created_at: String,
    #[serde(default)]
    pub member_list: Vec<ProjectMember>,
    #[serde(default)]
    pub auto_deployment_enabled: bool,
    #[serde(default)]
    pub https_enabled: bool,
    pub build_status: Option<BuildStatus>,
    pub last_build_at: Option<String>,
}

/// A docker image deployed alongside the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub image_name: String,
    pub tag: String,
    pub port: u16,
}

/// Full project detail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: u64,
    #[serde(default)]
    pub owner_id: u64,
    pub project_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(rename = "serverIP")]
    pub server_ip: String,
    pub repository_url: String,
    pub structure: RepoStructure,
    #[serde(default)]
    pub frontend_directory_name: String,
    #[serde(default)]
    pub backend_directory_name: String,
    #[serde(default)]
    pub frontend_branch_name: String,
    #[serde(default)]
    pub backend_branch_name: String,
    #[serde(default)]
    pub frontend_framework: String,
    #[serde(default)]
    pub frontend_env_file_path: String,
    #[serde(default)]
    pub nodejs_version: String,
    #[serde(default)]
    pub jdk_version: String,
    #[serde(default)]
    pub jdk_build_tool: String,
    #[serde(default)]
    pub backend_env_file_path: String,
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub application_list: Vec<Application>,
    #[serde(default)]
    pub pem_file_path: String,
}

/// Fields shared by both project creation layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProjectRequest {
    pub gitlab_project_id: u64,
    pub repository_url: String,
    pub gitlab_target_branch: String,
    #[serde(rename = "serverIP")]
    pub server_ip: String,
    pub frontend_framework: String,
    pub nodejs_version: String,
    pub jdk_version: String,
    pub jdk_build_tool: String,
    pub application_list: Vec<Application>,
}

/// Mono repository request: frontend and backend are directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonoProjectRequest {
    #[serde(flatten)]
    pub base: BaseProjectRequest,
    pub frontend_directory_name: String,
    pub backend_directory_name: String,
}

/// Multi repository request: frontend and backend are branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiProjectRequest {
    #[serde(flatten)]
    pub base: BaseProjectRequest,
    pub frontend_branch_name: String,
    pub backend_branch_name: String,
}

/// Project creation payload, discriminated by `structure`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "structure", rename_all = "UPPERCASE")]
pub enum ProjectCreateRequest {
    Mono(MonoProjectRequest),
    Multi(MultiProjectRequest),
}

impl ProjectCreateRequest {
    pub fn base(&self) -> &BaseProjectRequest {
        match self {
            ProjectCreateRequest::Mono(req) => &req.base,
            ProjectCreateRequest::Multi(req) => &req.base,
        }
    }

    pub fn structure(&self) -> RepoStructure {
        match self {
            ProjectCreateRequest::Mono(_) => RepoStructure::Mono,
            ProjectCreateRequest::Multi(_) => RepoStructure::Multi,
        }
    }
}

/// Project edit payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateRequest {
    #[serde(rename = "serverIP")]
    pub server_ip: String,
    pub applications: Vec<Application>,
}

/// Deployment status of one project, as returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectServerStatus {
    /// Raw status code, mapped client-side through the status table
    pub server_status: String,
    #[serde(default)]
    pub is_server_live: bool,
}

/// Overview row returned by `/projects/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    pub id: u64,
    pub project_name: String,
    #[serde(default)]
    pub https_enabled: bool,
    #[serde(default)]
    pub auto_deploy_enabled: bool,
    pub last_build_status: Option<BuildStatus>,
    pub last_build_at: Option<String>,
}

/// A single build, deploy or HTTPS execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: u64,
    pub project_name: String,
    pub execution_type: String,
    pub project_execution_title: String,
    pub execution_status: String,
    #[serde(default)]
    pub build_number: Option<String>,
    pub created_at: String,
}

/// Executions grouped by day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionGroup {
    pub date: String,
    pub execution_list: Vec<Execution>,
}

/// Application template returned by the application search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTemplate {
    pub image_name: String,
    #[serde(default)]
    pub default_ports: Vec<u16>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_envs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseProjectRequest {
        BaseProjectRequest {
            gitlab_project_id: 7,
            repository_url: "https://example.com/g/app.git".to_string(),
            gitlab_target_branch: "main".to_string(),
            server_ip: "10.0.0.1".to_string(),
            frontend_framework: "React".to_string(),
            nodejs_version: "22".to_string(),
            jdk_version: "17".to_string(),
            jdk_build_tool: "Gradle".to_string(),
            application_list: vec![],
        }
    }

    #[test]
    fn test_create_request_is_tagged_by_structure() {
        let req = ProjectCreateRequest::Multi(MultiProjectRequest {
            base: base(),
            frontend_branch_name: "dev/fe".to_string(),
            backend_branch_name: "dev/be".to_string(),
        });

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["structure"], "MULTI");
        assert_eq!(value["serverIP"], "10.0.0.1");
        assert_eq!(value["frontendBranchName"], "dev/fe");
        assert_eq!(value["gitlabProjectId"], 7);
    }

    #[test]
    fn test_detail_accepts_missing_optional_paths() {
        let raw = r#"{
            "id": 3,
            "projectName": "seed",
            "serverIP": "1.2.3.4",
            "repositoryUrl": "https://example.com/g/seed.git",
            "structure": "MONO"
        }"#;
        let detail: ProjectDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.structure, RepoStructure::Mono);
        assert!(detail.application_list.is_empty());
        assert!(detail.pem_file_path.is_empty());
    }
}
