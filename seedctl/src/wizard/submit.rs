//! Final wizard submission

use std::path::Path;

use tracing::{error, info};

use openapi_client::models::ProjectSummary;

use crate::errors::SeedError;
use crate::filesys::file::File;
use crate::http::projects::{ProjectFiles, Upload};
use crate::http::HttpClient;
use crate::stores::wizard::WizardStore;
use crate::wizard::payload::build_create_request;
use crate::wizard::state::Attachment;
use crate::wizard::steps::validate_all;

/// Validate every step, upload the project and clear the wizard.
///
/// On failure the wizard state is kept so the user can retry.
pub async fn submit(
    store: &mut WizardStore,
    client: &HttpClient,
) -> Result<Option<ProjectSummary>, SeedError> {
    let state = store.state().clone();
    validate_all(&state)?;

    let request = build_create_request(&state);
    let files = ProjectFiles {
        client_env: read_upload(state.env.front_env.as_ref(), "Frontend .env").await?,
        server_env: read_upload(state.env.back_env.as_ref(), "Backend .env").await?,
        pem: read_upload(state.server.pem.as_ref(), "PEM key").await?,
    };

    match client.create_project(&request, files).await {
        Ok(created) => {
            info!("Project submitted, clearing wizard");
            store.reset().await?;
            Ok(created)
        }
        Err(e) => {
            error!("Project submission failed: {}", e);
            Err(e)
        }
    }
}

/// Read an attachment from local disk
pub async fn read_upload(
    attachment: Option<&Attachment>,
    label: &'static str,
) -> Result<Upload, SeedError> {
    let path = attachment
        .and_then(|a| a.local_path.as_deref())
        .ok_or_else(|| {
            SeedError::ValidationError(crate::wizard::steps::StepError::MissingFile(label))
        })?;
    read_path(path).await
}

pub async fn read_path(path: &Path) -> Result<Upload, SeedError> {
    let file = File::new(path);
    if !file.exists().await {
        return Err(SeedError::NotFound(format!("{}", path.display())));
    }
    let contents = file.read_bytes().await?;
    Ok(Upload::new(file.file_name(), contents))
}
