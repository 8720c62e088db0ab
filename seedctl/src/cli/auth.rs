//! Login, logout and account identity commands

use anyhow::Context;
use tracing::warn;

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::authn::access_token::AccessToken;
use crate::authn::session::Session;

pub async fn login(
    app: &AppState,
    out: Output,
    access_token: String,
    refresh_token: String,
) -> anyhow::Result<()> {
    let token = AccessToken::inspect(&access_token);
    if token.is_expired() {
        warn!("Access token is already expired, it will be refreshed on first use");
    }

    app.session
        .store(Session::new(access_token, refresh_token))
        .await
        .context("failed to save session")?;

    let mut users = app.user_store().await;
    match users.fetch_user(&app.http_client).await {
        Ok(user) => {
            out.success(&format!("Logged in as {}", user.name));
        }
        Err(e) => {
            out.alert(&format!("Session saved, but the profile could not be loaded: {}", e));
        }
    }
    Ok(())
}

pub async fn logout(app: &AppState, out: Output) -> anyhow::Result<()> {
    if app.session.is_logged_in().await {
        if let Err(e) = app.http_client.logout().await {
            warn!("Server-side logout failed: {}", e);
        }
    }

    app.session.clear().await?;
    app.user_store().await.clear_user().await?;
    app.project_store().await.invalidate().await?;
    out.success("Logged out");
    Ok(())
}

pub async fn whoami(app: &AppState, out: Output, refresh: bool) -> anyhow::Result<()> {
    let mut users = app.user_store().await;
    if refresh || users.user().is_none() {
        app.require_login().await?;
        users.fetch_user(&app.http_client).await?;
    }

    let user = users.user().context("no user profile available")?;
    if out.json {
        out.print_json(user)?;
        return Ok(());
    }

    out.heading(&user.name);
    out.field("Username", &user.username);
    if let Some(id) = user.user_id {
        out.field("User ID", id);
    }
    if let Some(session) = app.session.current().await {
        if let Some(expires_at) = session.access().expires_at() {
            out.field("Token expires", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    Ok(())
}

pub async fn register_pat(app: &AppState, out: Output, token: &str) -> anyhow::Result<()> {
    app.require_login().await?;
    app.http_client
        .register_pat(token)
        .await
        .context("failed to register personal access token")?;
    out.success("Personal access token registered");
    Ok(())
}
