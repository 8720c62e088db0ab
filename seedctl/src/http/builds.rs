//! Jenkins build and server provisioning endpoints

use reqwest::multipart::{Form, Part};

use openapi_client::models::{BuildDetail, BuildPage, BuildSummary, HttpsLog};

use crate::errors::SeedError;
use crate::http::client::{HttpClient, NO_QUERY};
use crate::http::projects::Upload;

/// HTTPS conversion request
#[derive(Debug, Clone)]
pub struct HttpsRequest {
    pub project_id: u64,
    pub host: String,
    pub domain: String,
    pub email: String,
    pub pem: Upload,
}

impl HttpClient {
    /// One page of builds, newest first
    pub async fn list_builds(
        &self,
        project_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<BuildPage, SeedError> {
        self.get_bare(
            &format!("/jenkins/{}/builds", project_id),
            &[("start", start), ("limit", limit)],
        )
        .await
    }

    pub async fn last_build(&self, project_id: u64) -> Result<BuildSummary, SeedError> {
        self.get_bare(&format!("/jenkins/{}/builds/last", project_id), NO_QUERY)
            .await
    }

    /// Steps of one build
    pub async fn build_detail(
        &self,
        project_id: u64,
        build_number: u32,
    ) -> Result<BuildDetail, SeedError> {
        self.get_bare(
            &format!("/jenkins/{}/builds/{}", project_id, build_number),
            NO_QUERY,
        )
        .await
    }

    /// Full console log of one build
    pub async fn build_log(&self, project_id: u64, build_number: u32) -> Result<String, SeedError> {
        self.get_text(&format!("/jenkins/{}/builds/{}/log", project_id, build_number))
            .await
    }

    pub async fn step_log(
        &self,
        project_id: u64,
        build_number: u32,
        step_number: u32,
    ) -> Result<String, SeedError> {
        self.get_text(&format!(
            "/jenkins/{}/builds/{}/{}",
            project_id, build_number, step_number
        ))
        .await
    }

    /// Step logs of the last HTTPS conversion
    pub async fn https_logs(&self, project_id: u64) -> Result<Vec<HttpsLog>, SeedError> {
        self.get(&format!("/server/{}", project_id)).await
    }

    /// Start provisioning the project's server
    pub async fn start_build(&self, project_id: u64, pem: Upload) -> Result<(), SeedError> {
        let path = format!("/server/deployment?projectId={}", project_id);
        let form = Form::new().part("pemFile", pem.into_part());
        let request = self.request(reqwest::Method::POST, &path).multipart(form);
        // The backend answers with a plain confirmation string
        self.send(&path, request).await?;
        Ok(())
    }

    /// Convert the project's server to HTTPS
    pub async fn convert_https(&self, request: HttpsRequest) -> Result<(), SeedError> {
        let form = Form::new()
            .part("pem", request.pem.into_part())
            .part("host", Part::text(request.host))
            .part("domain", Part::text(request.domain))
            .part("email", Part::text(request.email))
            .part("projectId", Part::text(request.project_id.to_string()));

        let _: Option<String> = self.post_multipart("/server/convert", form).await?;
        Ok(())
    }
}
