//! User, session, notification, invitation and FCM endpoints

use reqwest::{header, Method};
use tracing::{info, warn};

use openapi_client::models::{InvitationRequest, Notification, Page, ProjectUsers, UserProfile};

use crate::errors::SeedError;
use crate::http::client::{HttpClient, NO_QUERY};

impl HttpClient {
    /// Profile of the logged-in user
    pub async fn me(&self) -> Result<UserProfile, SeedError> {
        self.get("/users/me").await
    }

    pub async fn logout(&self) -> Result<(), SeedError> {
        self.execute(Method::POST, "/users/logout", NO_QUERY).await
    }

    /// Register a GitLab personal access token
    pub async fn register_pat(&self, pat: &str) -> Result<(), SeedError> {
        let path = "/users/pat";
        let request = self
            .request(Method::POST, path)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(pat.to_string());
        self.send_void(path, request).await
    }

    /// Exchange the refresh token for a new access token and store it.
    ///
    /// The new token arrives in the `Authorization` response header.
    pub async fn refresh_token(&self) -> Result<String, SeedError> {
        let session = self
            .session()
            .ok_or_else(|| SeedError::AuthError("Not logged in".to_string()))?
            .clone();

        let path = "/token/refresh";
        let response = self.send(path, self.request(Method::POST, path)).await?;

        let raw = response
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                SeedError::TokenError("Refresh response carried no access token".to_string())
            })?;
        let token = strip_bearer(raw).to_string();
        if token.is_empty() {
            return Err(SeedError::TokenError("Refresh returned an empty token".to_string()));
        }

        session.update_access_token(token.clone()).await?;
        info!("Access token refreshed");
        Ok(token)
    }

    /// Refresh the access token when it expires within `seconds`
    pub async fn ensure_fresh_token(&self, seconds: i64) -> Result<(), SeedError> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        if !session.expires_within(seconds).await {
            return Ok(());
        }
        if let Err(e) = self.refresh_token().await {
            warn!("Unable to refresh the access token: {}", e);
            return Err(e);
        }
        Ok(())
    }

    pub async fn notifications(&self, page: u32, size: u32) -> Result<Page<Notification>, SeedError> {
        self.get_with_query("/notifications", &[("page", page), ("size", size)])
            .await
    }

    pub async fn unread_notifications(&self) -> Result<Vec<Notification>, SeedError> {
        self.get("/notifications/unread").await
    }

    pub async fn mark_notification_read(&self, notification_id: u64) -> Result<(), SeedError> {
        self.execute(
            Method::PATCH,
            &format!("/notifications/{}/read", notification_id),
            NO_QUERY,
        )
        .await
    }

    /// Invite users to a project
    pub async fn send_invitations(&self, request: &InvitationRequest) -> Result<(), SeedError> {
        let _: Option<serde_json::Value> = self.post("/invitations", request).await?;
        Ok(())
    }

    pub async fn accept_invitation(&self, invitation_id: u64) -> Result<(), SeedError> {
        self.execute(
            Method::POST,
            &format!("/invitations/{}/accept", invitation_id),
            NO_QUERY,
        )
        .await
    }

    pub async fn reject_invitation(&self, invitation_id: u64) -> Result<(), SeedError> {
        self.execute(
            Method::POST,
            &format!("/invitations/{}/reject", invitation_id),
            NO_QUERY,
        )
        .await
    }

    pub async fn project_members(&self, project_id: u64) -> Result<ProjectUsers, SeedError> {
        self.get(&format!("/user-projects/project/{}", project_id))
            .await
    }

    pub async fn register_fcm_token(&self, user_id: u64, token: &str) -> Result<(), SeedError> {
        let user_id = user_id.to_string();
        self.execute(
            Method::POST,
            "/fcm-tokens",
            &[("userId", user_id.as_str()), ("token", token)],
        )
        .await
    }

    pub async fn delete_fcm_token(&self, token: &str) -> Result<(), SeedError> {
        self.execute(Method::DELETE, "/fcm-tokens", &[("token", token)])
            .await
    }
}

fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim()
}
