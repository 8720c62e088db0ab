//! In-progress project creation state

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use openapi_client::models::{Application, ApplicationTemplate, ProjectDetail, RepoStructure};

/// Port assigned when an image advertises none
pub const FALLBACK_PORT: u16 = 8080;

/// A file chosen by the user.
///
/// A project loaded for editing only knows the server-side file name, so
/// `local_path` is absent until the file is picked again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub local_path: Option<PathBuf>,
}

impl Attachment {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            local_path: Some(path),
        }
    }

    /// A file known only by its path on the server
    pub fn remote(server_path: &str) -> Option<Self> {
        if server_path.is_empty() {
            return None;
        }
        Some(Self {
            name: crate::utils::file_name_of(server_path),
            local_path: None,
        })
    }
}

/// Step 1: repository selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceInfo {
    /// GitLab project ID
    pub gitlab_id: u64,
    pub repo_url: String,
    pub default_branch: String,
    pub structure: RepoStructure,
    /// Frontend directory (mono) or branch (multi)
    pub client_name: String,
    /// Backend directory (mono) or branch (multi)
    pub server_name: String,
}

/// Step 2: server connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerInfo {
    pub ip: String,
    pub pem: Option<Attachment>,
}

/// Step 3: one application container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub image_name: String,
    pub tag: String,
    pub port: u16,
    #[serde(default)]
    pub default_ports: Vec<u16>,
    #[serde(default)]
    pub description: String,
    /// Environment variables the image expects
    #[serde(default)]
    pub image_envs: Vec<String>,
}

impl AppEntry {
    /// New entry from a search result, on the first advertised port
    pub fn from_template(template: &ApplicationTemplate, tag: impl Into<String>) -> Self {
        Self {
            image_name: template.image_name.clone(),
            tag: tag.into(),
            port: template.default_ports.first().copied().unwrap_or(FALLBACK_PORT),
            default_ports: template.default_ports.clone(),
            description: template.description.clone(),
            image_envs: template.image_envs.clone(),
        }
    }

    pub fn to_application(&self) -> Application {
        Application {
            image_name: self.image_name.clone(),
            tag: self.tag.clone(),
            port: self.port,
        }
    }
}

impl From<&Application> for AppEntry {
    fn from(app: &Application) -> Self {
        Self {
            image_name: app.image_name.clone(),
            tag: app.tag.clone(),
            port: app.port,
            default_ports: vec![app.port],
            description: String::new(),
            image_envs: Vec::new(),
        }
    }
}

/// Step 4: build environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvInfo {
    pub frontend_framework: String,
    pub front_env: Option<Attachment>,
    pub back_env: Option<Attachment>,
    pub node: String,
    pub jdk: String,
    pub build_tool: String,
}

impl Default for EnvInfo {
    fn default() -> Self {
        Self {
            frontend_framework: "React".to_string(),
            front_env: None,
            back_env: None,
            node: "22".to_string(),
            jdk: "17".to_string(),
            build_tool: "Gradle".to_string(),
        }
    }
}

/// Everything the wizard has collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    /// Owner of the project being edited, zero for a new project
    pub owner_id: u64,
    pub source: SourceInfo,
    pub server: ServerInfo,
    pub apps: Vec<AppEntry>,
    pub env: EnvInfo,
}

impl From<&ProjectDetail> for WizardState {
    fn from(detail: &ProjectDetail) -> Self {
        let (client_name, server_name, default_branch) = match detail.structure {
            RepoStructure::Mono => (
                detail.frontend_directory_name.clone(),
                detail.backend_directory_name.clone(),
                String::new(),
            ),
            RepoStructure::Multi => (
                detail.frontend_branch_name.clone(),
                detail.backend_branch_name.clone(),
                detail.backend_branch_name.clone(),
            ),
        };

        WizardState {
            owner_id: detail.owner_id,
            source: SourceInfo {
                gitlab_id: 0,
                repo_url: detail.repository_url.clone(),
                default_branch,
                structure: detail.structure,
                client_name,
                server_name,
            },
            server: ServerInfo {
                ip: detail.server_ip.clone(),
                pem: Attachment::remote(&detail.pem_file_path),
            },
            apps: detail.application_list.iter().map(AppEntry::from).collect(),
            env: EnvInfo {
                frontend_framework: detail.frontend_framework.clone(),
                front_env: Attachment::remote(&detail.frontend_env_file_path),
                back_env: Attachment::remote(&detail.backend_env_file_path),
                node: detail.nodejs_version.clone(),
                jdk: detail.jdk_version.clone(),
                build_tool: detail.jdk_build_tool.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(structure: RepoStructure) -> ProjectDetail {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "ownerId": 9,
            "projectName": "shop",
            "serverIP": "10.0.0.5",
            "repositoryUrl": "https://example.com/g/shop.git",
            "structure": structure,
            "frontendDirectoryName": "web",
            "backendDirectoryName": "api",
            "frontendBranchName": "fe",
            "backendBranchName": "be",
            "frontendFramework": "Vue",
            "frontendEnvFilePath": "/srv/env/front.env",
            "nodejsVersion": "20",
            "jdkVersion": "21",
            "jdkBuildTool": "Maven",
            "backendEnvFilePath": "",
            "applicationList": [{"imageName": "redis", "tag": "7", "port": 6379}],
            "pemFilePath": "/srv/keys/shop.pem"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_mono_detail() {
        let state = WizardState::from(&detail(RepoStructure::Mono));
        assert_eq!(state.owner_id, 9);
        assert_eq!(state.source.client_name, "web");
        assert_eq!(state.source.server_name, "api");
        assert_eq!(state.server.pem.as_ref().map(|a| a.name.as_str()), Some("shop.pem"));
        assert!(state.server.pem.as_ref().unwrap().local_path.is_none());
        assert_eq!(state.env.front_env.as_ref().map(|a| a.name.as_str()), Some("front.env"));
        assert!(state.env.back_env.is_none());
        assert_eq!(state.apps[0].default_ports, vec![6379]);
    }

    #[test]
    fn test_from_multi_detail_uses_branches() {
        let state = WizardState::from(&detail(RepoStructure::Multi));
        assert_eq!(state.source.client_name, "fe");
        assert_eq!(state.source.server_name, "be");
        assert_eq!(state.source.default_branch, "be");
    }

    #[test]
    fn test_detail_without_pem_can_be_edited() {
        let mut raw = serde_json::to_value(detail(RepoStructure::Mono)).unwrap();
        raw["pemFilePath"] = serde_json::Value::String(String::new());
        let detail: ProjectDetail = serde_json::from_value(raw).unwrap();

        let mut state = WizardState::from(&detail);
        assert!(state.server.pem.is_none());
        state.server.ip = "10.0.0.9".to_string();
        assert_eq!(crate::wizard::steps::validate_edit(&state), Ok(()));
    }
}
