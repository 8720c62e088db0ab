//! Cached project list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use openapi_client::models::ProjectSummary;

use crate::errors::SeedError;
use crate::filesys::file::File;
use crate::http::HttpClient;
use crate::storage::persisted::{self, Persisted};

/// Shown instead of the underlying error when the list cannot be fetched
pub const LOAD_ERROR: &str = "Failed to load projects.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectCache {
    pub projects: Vec<ProjectSummary>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Persisted for ProjectCache {
    const SCHEMA_VERSION: u32 = 1;
    const NAME: &'static str = "projects";
}

pub struct ProjectStore {
    file: File,
    cache: ProjectCache,
    loading: bool,
    error: Option<String>,
}

impl ProjectStore {
    pub async fn load(file: File) -> Self {
        let (cache, _) = persisted::load(&file).await;
        Self {
            file,
            cache,
            loading: false,
            error: None,
        }
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        &self.cache.projects
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cache.fetched_at
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the project list unless it is cached and `force` is off.
    ///
    /// Failures are recorded in `error()` and the cached list is kept.
    pub async fn load_projects(&mut self, client: &HttpClient, force: bool) -> &[ProjectSummary] {
        if !force && !self.cache.projects.is_empty() {
            return &self.cache.projects;
        }

        self.loading = true;
        self.error = None;
        match client.list_projects().await {
            Ok(projects) => {
                self.cache = ProjectCache {
                    projects,
                    fetched_at: Some(Utc::now()),
                };
                if let Err(e) = self.save().await {
                    warn!("Unable to cache projects: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to fetch projects: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        self.loading = false;

        &self.cache.projects
    }

    pub async fn save(&self) -> Result<(), SeedError> {
        persisted::save(&self.file, &self.cache).await
    }

    /// Drop the cache, e.g. after a project was created or deleted
    pub async fn invalidate(&mut self) -> Result<(), SeedError> {
        self.cache = ProjectCache::default();
        self.file.delete().await
    }
}
