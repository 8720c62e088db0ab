//! GitLab and Docker Hub proxy endpoints

use tracing::debug;

use openapi_client::models::{
    DockerImage, DockerPage, DockerTag, GitlabRepository, RepositoryListing, RepositoryPage,
};

use crate::errors::SeedError;
use crate::http::client::HttpClient;

/// Upper bound on followed cursors, guarding against a backend that repeats one
const MAX_REPOSITORY_PAGES: usize = 100;

impl HttpClient {
    /// One page of the user's GitLab repositories
    pub async fn list_repositories(
        &self,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, SeedError> {
        let listing: RepositoryListing = match cursor {
            Some(cursor) => {
                self.get_with_query("/gitlab/projects", &[("cursor", cursor)])
                    .await?
            }
            None => self.get("/gitlab/projects").await?,
        };
        Ok(listing.into())
    }

    /// Every repository, following cursors until exhausted
    pub async fn all_repositories(&self) -> Result<Vec<GitlabRepository>, SeedError> {
        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_REPOSITORY_PAGES {
            let page = self.list_repositories(cursor.as_deref()).await?;
            repositories.extend(page.repositories);

            match page.next_cursor {
                Some(next) if !next.is_empty() && Some(&next) != cursor.as_ref() => {
                    debug!("Following repository cursor {}", next);
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        Ok(repositories)
    }

    /// Search official Docker Hub images
    pub async fn search_images(&self, keyword: &str) -> Result<Vec<DockerImage>, SeedError> {
        let page: DockerPage<DockerImage> =
            self.get(&format!("/docker/images/{}", keyword)).await?;
        Ok(page.results)
    }

    pub async fn image_tags(&self, image: &str) -> Result<Vec<DockerTag>, SeedError> {
        self.get(&format!("/docker/images/{}/tags", image)).await
    }
}
