//! User, notification and membership models

use serde::{Deserialize, Serialize};

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<u64>,
    /// E-mail address
    pub name: String,
    /// GitLab username
    pub username: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub notification_title: String,
    pub notification_content: String,
    pub created_at: String,
    pub notification_type: String,
    #[serde(default)]
    pub invitation_id: Option<u64>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub project_id: u64,
    pub id_list: Vec<u64>,
}

/// Member of a project, with invitation state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUser {
    pub user_id: u64,
    pub user_name: String,
    #[serde(default)]
    pub user_identify_id: String,
    #[serde(default)]
    pub profile_image_url: String,
    pub status: crate::models::MemberStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUsers {
    pub project_id: u64,
    pub users: Vec<ProjectUser>,
}
