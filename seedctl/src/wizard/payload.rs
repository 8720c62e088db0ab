//! Turning wizard state into backend requests

use openapi_client::models::{
    BaseProjectRequest, MonoProjectRequest, MultiProjectRequest, ProjectCreateRequest,
    ProjectUpdateRequest, RepoStructure,
};

use crate::wizard::state::WizardState;

/// Build the creation request. The repository layout decides whether the
/// client/server names are sent as directories or as branches.
pub fn build_create_request(state: &WizardState) -> ProjectCreateRequest {
    let source = &state.source;
    let base = BaseProjectRequest {
        gitlab_project_id: source.gitlab_id,
        repository_url: source.repo_url.clone(),
        gitlab_target_branch: source.default_branch.clone(),
        server_ip: state.server.ip.clone(),
        frontend_framework: state.env.frontend_framework.clone(),
        nodejs_version: state.env.node.clone(),
        jdk_version: state.env.jdk.clone(),
        jdk_build_tool: state.env.build_tool.clone(),
        application_list: state.apps.iter().map(|app| app.to_application()).collect(),
    };

    match source.structure {
        RepoStructure::Mono => ProjectCreateRequest::Mono(MonoProjectRequest {
            base,
            frontend_directory_name: source.client_name.clone(),
            backend_directory_name: source.server_name.clone(),
        }),
        RepoStructure::Multi => ProjectCreateRequest::Multi(MultiProjectRequest {
            base,
            frontend_branch_name: source.client_name.clone(),
            backend_branch_name: source.server_name.clone(),
        }),
    }
}

/// Build the edit request for an existing project
pub fn build_update_request(state: &WizardState) -> ProjectUpdateRequest {
    ProjectUpdateRequest {
        server_ip: state.server.ip.clone(),
        applications: state.apps.iter().map(|app| app.to_application()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::AppEntry;

    fn state(structure: RepoStructure) -> WizardState {
        let mut state = WizardState::default();
        state.source.gitlab_id = 12;
        state.source.repo_url = "https://example.com/g/app.git".to_string();
        state.source.default_branch = "main".to_string();
        state.source.structure = structure;
        state.source.client_name = "web".to_string();
        state.source.server_name = "api".to_string();
        state.server.ip = "10.0.0.1".to_string();
        state.apps.push(AppEntry {
            image_name: "redis".to_string(),
            tag: "7".to_string(),
            port: 6379,
            default_ports: vec![6379],
            description: String::new(),
            image_envs: vec![],
        });
        state
    }

    #[test]
    fn test_update_request() {
        let request = build_update_request(&state(RepoStructure::Mono));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["serverIP"], "10.0.0.1");
        assert_eq!(json["applications"][0]["imageName"], "redis");
        assert_eq!(json["applications"][0]["port"], 6379);
    }

    #[test]
    fn test_base_fields_are_shared() {
        let mono = build_create_request(&state(RepoStructure::Mono));
        let multi = build_create_request(&state(RepoStructure::Multi));
        assert_eq!(mono.base(), multi.base());
        assert_eq!(mono.base().gitlab_target_branch, "main");
        assert_eq!(mono.base().jdk_build_tool, "Gradle");
    }

    #[test]
    fn test_layout_decides_directory_or_branch_fields() {
        let mono = serde_json::to_value(build_create_request(&state(RepoStructure::Mono))).unwrap();
        assert_eq!(mono["frontendDirectoryName"], "web");
        assert_eq!(mono["backendDirectoryName"], "api");
        assert!(mono.get("frontendBranchName").is_none());
        assert!(mono.get("backendBranchName").is_none());

        let multi =
            serde_json::to_value(build_create_request(&state(RepoStructure::Multi))).unwrap();
        assert_eq!(multi["frontendBranchName"], "web");
        assert_eq!(multi["backendBranchName"], "api");
        assert!(multi.get("frontendDirectoryName").is_none());
        assert!(multi.get("backendDirectoryName").is_none());
    }
}
