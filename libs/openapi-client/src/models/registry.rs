//! GitLab and Docker registry models

use serde::{Deserialize, Serialize};

/// A GitLab repository visible to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitlabRepository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    pub http_url_to_repo: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A page of repositories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPage {
    pub repositories: Vec<GitlabRepository>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The repository listing is either a bare list or a cursor page
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepositoryListing {
    Page(RepositoryPage),
    List(Vec<GitlabRepository>),
}

impl From<RepositoryListing> for RepositoryPage {
    fn from(listing: RepositoryListing) -> Self {
        match listing {
            RepositoryListing::Page(page) => page,
            RepositoryListing::List(repositories) => RepositoryPage {
                repositories,
                next_cursor: None,
            },
        }
    }
}

/// Docker Hub search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerImage {
    pub repo_name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub star_count: u64,
    #[serde(default)]
    pub is_official: bool,
}

/// Docker Hub image tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerTag {
    pub name: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Docker Hub paginated result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerPage<T> {
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(alias = "image")]
    pub results: Vec<T>,
}
