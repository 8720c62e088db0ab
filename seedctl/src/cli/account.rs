//! Notifications, invitations, push tokens and theme

use anyhow::{bail, Context};
use clap::Subcommand;

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::stores::theme::ThemeMode;
use crate::utils::format_date_time;

#[derive(Subcommand)]
pub enum NotificationSubcommand {
    /// Mark a notification as read
    Read { notification_id: u64 },
}

#[derive(Subcommand)]
pub enum InviteSubcommand {
    /// Join the project
    Accept { invitation_id: u64 },
    /// Decline the invitation
    Reject { invitation_id: u64 },
}

#[derive(Subcommand)]
pub enum FcmSubcommand {
    /// Register a device token for push notifications
    Register { token: String },
    /// Stop push notifications to a device token
    Delete { token: String },
}

pub async fn notifications(
    app: &AppState,
    out: Output,
    unread: bool,
    page: u32,
    size: u32,
) -> anyhow::Result<()> {
    app.require_login().await?;
    let (items, footer) = if unread {
        (app.http_client.unread_notifications().await?, None)
    } else {
        let page = app.http_client.notifications(page, size).await?;
        let footer = format!(
            "Page {} of {} ({} total)",
            page.number + 1,
            page.total_pages.max(1),
            page.total_elements
        );
        (page.content, Some(footer))
    };

    if out.json {
        out.print_json(&items)?;
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|n| {
            vec![
                n.id.to_string(),
                if n.read { "" } else { "*" }.to_string(),
                n.notification_title.clone(),
                n.notification_content.clone(),
                n.invitation_id
                    .map(|id| format!("invite {}", id))
                    .unwrap_or_default(),
                format_date_time(&n.created_at).unwrap_or_else(|| n.created_at.clone()),
            ]
        })
        .collect();
    out.print_table(&["ID", "", "TITLE", "MESSAGE", "ACTION", "DATE"], rows);
    if let Some(footer) = footer {
        println!("{}", footer);
    }
    Ok(())
}

pub async fn notification(
    app: &AppState,
    out: Output,
    subcmd: NotificationSubcommand,
) -> anyhow::Result<()> {
    app.require_login().await?;
    match subcmd {
        NotificationSubcommand::Read { notification_id } => {
            app.http_client
                .mark_notification_read(notification_id)
                .await?;
            out.success(&format!("Notification {} marked as read", notification_id));
        }
    }
    Ok(())
}

pub async fn invite(app: &AppState, out: Output, subcmd: InviteSubcommand) -> anyhow::Result<()> {
    app.require_login().await?;
    match subcmd {
        InviteSubcommand::Accept { invitation_id } => {
            app.http_client.accept_invitation(invitation_id).await?;
            app.project_store().await.invalidate().await?;
            out.success("Invitation accepted");
        }
        InviteSubcommand::Reject { invitation_id } => {
            app.http_client.reject_invitation(invitation_id).await?;
            out.success("Invitation rejected");
        }
    }
    Ok(())
}

pub async fn fcm(app: &AppState, out: Output, subcmd: FcmSubcommand) -> anyhow::Result<()> {
    app.require_login().await?;
    match subcmd {
        FcmSubcommand::Register { token } => {
            let mut users = app.user_store().await;
            let user_id = match users.user().and_then(|u| u.user_id) {
                Some(id) => id,
                None => users
                    .fetch_user(&app.http_client)
                    .await?
                    .user_id
                    .context("the backend did not report a user ID")?,
            };
            app.http_client.register_fcm_token(user_id, &token).await?;
            out.success("Push notifications enabled");
        }
        FcmSubcommand::Delete { token } => {
            app.http_client.delete_fcm_token(&token).await?;
            out.success("Push notifications disabled");
        }
    }
    Ok(())
}

pub async fn theme(app: &AppState, out: Output, mode: Option<&str>) -> anyhow::Result<()> {
    let mut store = app.theme_store().await;
    let mode = match mode {
        None => {
            if out.json {
                out.print_json(&serde_json::json!({
                    "mode": store.mode(),
                    "effective": store.effective_mode(),
                }))?;
            } else {
                println!("{}", store.effective_mode());
            }
            return Ok(());
        }
        Some("toggle") => store.toggle_mode(),
        Some(value) => match value.parse::<ThemeMode>() {
            Ok(mode) => {
                store.set_mode(mode);
                mode
            }
            Err(_) => bail!("unknown theme '{value}', expected light, dark or toggle"),
        },
    };
    store.save().await?;
    out.success(&format!("Theme set to {}", mode));
    Ok(())
}
