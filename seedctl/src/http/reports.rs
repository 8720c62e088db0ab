//! AI report endpoints

use openapi_client::models::{AiReport, AiReportDetail, AiReportList};

use crate::errors::SeedError;
use crate::http::client::HttpClient;

impl HttpClient {
    pub async fn ai_reports(&self, project_id: u64) -> Result<Vec<AiReport>, SeedError> {
        let list: AiReportList = self
            .get_with_query("/ai-report", &[("projectId", project_id)])
            .await?;
        Ok(list.reports)
    }

    pub async fn ai_report_detail(&self, report_id: u64) -> Result<AiReportDetail, SeedError> {
        self.get_with_query("/ai-report/detail", &[("reportId", report_id)])
            .await
    }
}
