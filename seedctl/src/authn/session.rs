//! Session management

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::authn::access_token::AccessToken;
use crate::errors::SeedError;
use crate::filesys::file::File;

/// On-disk form of a session
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    access_token: String,
    refresh_token: String,
}

/// Stored credentials
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    pub fn access(&self) -> AccessToken {
        AccessToken::inspect(self.access_token.expose_secret())
    }
}

/// Source of credentials for outgoing requests
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current access token, if logged in
    async fn access_token(&self) -> Option<String>;

    /// Current refresh token, if logged in
    async fn refresh_token(&self) -> Option<String>;

    /// Replace the access token after a refresh
    async fn update_access_token(&self, token: String) -> Result<(), SeedError>;

    /// Whether the access token needs refreshing within `seconds`
    async fn expires_within(&self, seconds: i64) -> bool;
}

/// File-backed session with an in-memory cache
pub struct SessionManager {
    file: File,
    cached: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Load the session file, if any
    pub async fn load(file: File) -> Result<Self, SeedError> {
        let cached = if file.exists().await {
            let raw: SessionFile = file.read_json().await.map_err(|e| {
                SeedError::AuthError(format!("Failed to read session file: {}", e))
            })?;
            Some(Session::new(raw.access_token, raw.refresh_token))
        } else {
            None
        };

        Ok(Self {
            file,
            cached: RwLock::new(cached),
        })
    }

    /// Session that is never written to disk
    pub fn in_memory(session: Option<Session>) -> Self {
        Self {
            file: File::new(""),
            cached: RwLock::new(session),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.cached.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.cached.read().await.is_some()
    }

    /// Persist a new session
    pub async fn store(&self, session: Session) -> Result<(), SeedError> {
        self.persist(&session).await?;
        *self.cached.write().await = Some(session);
        info!("Session stored");
        Ok(())
    }

    /// Forget the session and remove the file
    pub async fn clear(&self) -> Result<(), SeedError> {
        *self.cached.write().await = None;
        if !self.file.path().as_os_str().is_empty() {
            self.file.delete().await?;
        }
        debug!("Session cleared");
        Ok(())
    }

    async fn persist(&self, session: &Session) -> Result<(), SeedError> {
        if self.file.path().as_os_str().is_empty() {
            return Ok(());
        }
        let raw = SessionFile {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session.refresh_token.expose_secret().to_string(),
        };
        self.file.write_private_json(&raw).await
    }
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn access_token(&self) -> Option<String> {
        self.cached
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.expose_secret().to_string())
    }

    async fn refresh_token(&self) -> Option<String> {
        self.cached
            .read()
            .await
            .as_ref()
            .map(|s| s.refresh_token.expose_secret().to_string())
    }

    async fn update_access_token(&self, token: String) -> Result<(), SeedError> {
        let session = {
            let cached = self.cached.read().await;
            let current = cached
                .as_ref()
                .ok_or_else(|| SeedError::AuthError("Not logged in".to_string()))?;
            Session {
                access_token: SecretString::from(token),
                refresh_token: current.refresh_token.clone(),
            }
        };
        self.store(session).await
    }

    async fn expires_within(&self, seconds: i64) -> bool {
        match self.cached.read().await.as_ref() {
            Some(session) => session.access().expires_within(seconds),
            None => false,
        }
    }
}
