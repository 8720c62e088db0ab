//! Logged-in user

use serde::{Deserialize, Serialize};
use tracing::warn;

use openapi_client::models::UserProfile;

use crate::errors::SeedError;
use crate::filesys::file::File;
use crate::http::HttpClient;
use crate::storage::persisted::{self, Persisted};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSnapshot {
    pub user: Option<UserProfile>,
}

impl Persisted for UserSnapshot {
    const SCHEMA_VERSION: u32 = 1;
    const NAME: &'static str = "user";
}

pub struct UserStore {
    file: File,
    user: Option<UserProfile>,
    hydrated: bool,
}

impl UserStore {
    /// Read the cached user. The store is hydrated afterwards even when the
    /// file was missing or discarded.
    pub async fn load(file: File) -> Self {
        let (snapshot, _): (UserSnapshot, _) = persisted::load(&file).await;
        Self {
            file,
            user: snapshot.user,
            hydrated: true,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub async fn set_user(&mut self, user: UserProfile) -> Result<(), SeedError> {
        self.user = Some(user);
        self.save().await
    }

    /// Fetch the profile; any failure clears the cached user
    pub async fn fetch_user(&mut self, client: &HttpClient) -> Result<&UserProfile, SeedError> {
        match client.me().await {
            Ok(user) => {
                self.set_user(user).await?;
                self.user
                    .as_ref()
                    .ok_or_else(|| SeedError::Internal("user vanished after store".to_string()))
            }
            Err(e) => {
                warn!("Unable to fetch user profile: {}", e);
                self.clear_user().await?;
                Err(e)
            }
        }
    }

    pub async fn clear_user(&mut self) -> Result<(), SeedError> {
        self.user = None;
        self.file.delete().await
    }

    async fn save(&self) -> Result<(), SeedError> {
        let snapshot = UserSnapshot {
            user: self.user.clone(),
        };
        persisted::save(&self.file, &snapshot).await
    }
}
