//! Project endpoints

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use openapi_client::models::{
    ApplicationTemplate, ExecutionGroup, ProjectCreateRequest, ProjectDetail, ProjectServerStatus,
    ProjectStatus, ProjectSummary, ProjectUpdateRequest,
};

use crate::errors::SeedError;
use crate::http::client::{HttpClient, NO_QUERY};

/// File attached to a multipart upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    pub(crate) fn into_part(self) -> Part {
        Part::bytes(self.contents).file_name(self.file_name)
    }
}

/// Files sent along with a project creation request
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    pub client_env: Upload,
    pub server_env: Upload,
    pub pem: Upload,
}

impl HttpClient {
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, SeedError> {
        self.get("/projects").await
    }

    pub async fn project_detail(&self, project_id: u64) -> Result<ProjectDetail, SeedError> {
        self.get(&format!("/projects/{}/detail", project_id)).await
    }

    /// Create a project from the wizard payload
    pub async fn create_project(
        &self,
        request: &ProjectCreateRequest,
        files: ProjectFiles,
    ) -> Result<Option<ProjectSummary>, SeedError> {
        let json = serde_json::to_string(request)?;
        let form = Form::new()
            .part("projectRequest", Part::text(json).mime_str("application/json")?)
            .part("clientEnvFile", files.client_env.into_part())
            .part("serverEnvFile", files.server_env.into_part())
            .part("pemFile", files.pem.into_part());

        let created = self.post_multipart("/projects", form).await?;
        info!("Project created for {}", request.base().repository_url);
        Ok(created)
    }

    pub async fn update_project(
        &self,
        project_id: u64,
        request: &ProjectUpdateRequest,
    ) -> Result<(), SeedError> {
        let _: Option<serde_json::Value> = self
            .put(&format!("/projects/{}", project_id), request)
            .await?;
        Ok(())
    }

    pub async fn delete_project(&self, project_id: u64) -> Result<(), SeedError> {
        self.execute(Method::DELETE, &format!("/projects/{}", project_id), NO_QUERY)
            .await
    }

    /// Current server status of one project
    pub async fn project_status(&self, project_id: u64) -> Result<ProjectServerStatus, SeedError> {
        self.get(&format!("/projects/{}/status", project_id)).await
    }

    /// Status overview of every project the user belongs to
    pub async fn project_statuses(&self) -> Result<Vec<ProjectStatus>, SeedError> {
        self.get("/projects/status").await
    }

    /// Executions grouped by day
    pub async fn project_executions(&self) -> Result<Vec<ExecutionGroup>, SeedError> {
        self.get("/projects/executions").await
    }

    pub async fn search_applications(
        &self,
        keyword: &str,
    ) -> Result<Vec<ApplicationTemplate>, SeedError> {
        self.get_with_query("/projects/applications", &[("keyword", keyword)])
            .await
    }
}
