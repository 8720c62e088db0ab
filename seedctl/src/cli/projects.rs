//! Project listing, inspection and editing

use anyhow::{bail, Context};
use clap::Subcommand;

use openapi_client::models::{Application, BuildStatus, InvitationRequest, RepoStructure};

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::utils::{format_date_time, format_hhmmss};
use crate::wizard::payload::build_update_request;
use crate::wizard::state::{AppEntry, WizardState};
use crate::wizard::steps::validate_edit;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Show the full configuration of a project
    Show { project_id: u64 },
    /// Change the server IP or the applications of a project
    Edit {
        project_id: u64,
        #[arg(long)]
        ip: Option<String>,
        /// Replace the application list, as IMAGE:TAG:PORT (repeatable)
        #[arg(long = "app", value_name = "IMAGE:TAG:PORT")]
        apps: Vec<String>,
    },
    /// Delete a project
    Delete {
        project_id: u64,
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
    /// List project members and pending invitations
    Members { project_id: u64 },
    /// Invite users to a project
    Invite {
        project_id: u64,
        #[arg(required = true)]
        user_ids: Vec<u64>,
    },
}

pub async fn run(app: &AppState, out: Output, subcmd: ProjectSubcommand) -> anyhow::Result<()> {
    app.require_login().await?;
    match subcmd {
        ProjectSubcommand::Show { project_id } => show(app, out, project_id).await,
        ProjectSubcommand::Edit {
            project_id,
            ip,
            apps,
        } => edit(app, out, project_id, ip, &apps).await,
        ProjectSubcommand::Delete { project_id, yes } => delete(app, out, project_id, yes).await,
        ProjectSubcommand::Members { project_id } => members(app, out, project_id).await,
        ProjectSubcommand::Invite {
            project_id,
            user_ids,
        } => invite(app, out, project_id, user_ids).await,
    }
}

pub async fn list(app: &AppState, out: Output, refresh: bool) -> anyhow::Result<()> {
    app.require_login().await?;
    let mut store = app.project_store().await;
    let projects = store.load_projects(&app.http_client, refresh).await.to_vec();
    if let Some(error) = store.error() {
        out.alert(error);
        if projects.is_empty() {
            bail!("{}", error);
        }
    }

    if out.json {
        out.print_json(&projects)?;
        return Ok(());
    }
    if projects.is_empty() {
        println!("No projects yet. Run `seedctl wizard status` to create one.");
        return Ok(());
    }

    let rows = projects
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.project_name.clone(),
                build_status_label(p.build_status).to_string(),
                p.last_build_at
                    .as_deref()
                    .and_then(format_date_time)
                    .unwrap_or_else(|| "-".to_string()),
                yes_no(p.https_enabled).to_string(),
                p.member_list.len().to_string(),
            ]
        })
        .collect();
    out.print_table(
        &["ID", "NAME", "LAST BUILD", "BUILT AT", "HTTPS", "MEMBERS"],
        rows,
    );
    Ok(())
}

async fn show(app: &AppState, out: Output, project_id: u64) -> anyhow::Result<()> {
    let detail = app
        .http_client
        .project_detail(project_id)
        .await
        .with_context(|| format!("project {project_id} not found"))?;
    if out.json {
        out.print_json(&detail)?;
        return Ok(());
    }

    out.heading(&detail.project_name);
    out.field("Repository", &detail.repository_url);
    out.field("Server IP", &detail.server_ip);
    match detail.structure {
        RepoStructure::Mono => {
            out.field("Structure", "mono");
            out.field("Frontend dir", &detail.frontend_directory_name);
            out.field("Backend dir", &detail.backend_directory_name);
        }
        RepoStructure::Multi => {
            out.field("Structure", "multi");
            out.field("Frontend", &detail.frontend_branch_name);
            out.field("Backend", &detail.backend_branch_name);
        }
    }
    out.field("Framework", &detail.frontend_framework);
    out.field("Node.js", &detail.nodejs_version);
    out.field(
        "JDK",
        format!("{} ({})", detail.jdk_version, detail.jdk_build_tool),
    );
    if let Some(domain) = &detail.domain_name {
        out.field("Domain", domain);
    }
    for app in &detail.application_list {
        out.field("Application", format!("{}:{} on {}", app.image_name, app.tag, app.port));
    }
    Ok(())
}

async fn edit(
    app: &AppState,
    out: Output,
    project_id: u64,
    ip: Option<String>,
    apps: &[String],
) -> anyhow::Result<()> {
    if ip.is_none() && apps.is_empty() {
        bail!("nothing to change: pass --ip or --app");
    }

    let detail = app.http_client.project_detail(project_id).await?;
    let mut state = WizardState::from(&detail);
    if let Some(ip) = ip {
        state.server.ip = ip;
    }
    if !apps.is_empty() {
        state.apps = apps
            .iter()
            .map(|spec| parse_app_spec(spec).map(|a| AppEntry::from(&a)))
            .collect::<anyhow::Result<_>>()?;
    }
    validate_edit(&state)?;

    let request = build_update_request(&state);
    app.http_client
        .update_project(project_id, &request)
        .await
        .context("failed to update project")?;
    app.project_store().await.invalidate().await?;
    out.success(&format!("Project {} updated", detail.project_name));
    Ok(())
}

async fn delete(app: &AppState, out: Output, project_id: u64, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("deleting a project cannot be undone, pass --yes to confirm");
    }
    app.http_client.delete_project(project_id).await?;
    app.project_store().await.invalidate().await?;
    out.success(&format!("Project {} deleted", project_id));
    Ok(())
}

async fn members(app: &AppState, out: Output, project_id: u64) -> anyhow::Result<()> {
    let members = app.http_client.project_members(project_id).await?;
    if out.json {
        out.print_json(&members)?;
        return Ok(());
    }
    let rows = members
        .users
        .iter()
        .map(|u| {
            vec![
                u.user_id.to_string(),
                u.user_name.clone(),
                u.user_identify_id.clone(),
                format!("{:?}", u.status).to_lowercase(),
            ]
        })
        .collect();
    out.print_table(&["ID", "NAME", "USERNAME", "STATUS"], rows);
    Ok(())
}

async fn invite(
    app: &AppState,
    out: Output,
    project_id: u64,
    user_ids: Vec<u64>,
) -> anyhow::Result<()> {
    let count = user_ids.len();
    app.http_client
        .send_invitations(&InvitationRequest {
            project_id,
            id_list: user_ids,
        })
        .await?;
    out.success(&format!("Sent {} invitation(s)", count));
    Ok(())
}

pub async fn overview(app: &AppState, out: Output) -> anyhow::Result<()> {
    app.require_login().await?;
    let statuses = app.http_client.project_statuses().await?;
    if out.json {
        out.print_json(&statuses)?;
        return Ok(());
    }
    let rows = statuses
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.project_name.clone(),
                build_status_label(s.last_build_status).to_string(),
                s.last_build_at
                    .as_deref()
                    .and_then(format_date_time)
                    .unwrap_or_else(|| "-".to_string()),
                yes_no(s.auto_deploy_enabled).to_string(),
                yes_no(s.https_enabled).to_string(),
            ]
        })
        .collect();
    out.print_table(
        &["ID", "NAME", "LAST BUILD", "BUILT AT", "AUTO DEPLOY", "HTTPS"],
        rows,
    );
    Ok(())
}

pub async fn executions(app: &AppState, out: Output) -> anyhow::Result<()> {
    app.require_login().await?;
    let groups = app.http_client.project_executions().await?;
    if out.json {
        out.print_json(&groups)?;
        return Ok(());
    }
    for group in &groups {
        out.heading(&group.date);
        let rows = group
            .execution_list
            .iter()
            .map(|e| {
                vec![
                    e.project_name.clone(),
                    e.execution_type.clone(),
                    e.project_execution_title.clone(),
                    e.execution_status.clone(),
                    format_hhmmss(&e.created_at).unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        out.print_table(&["PROJECT", "TYPE", "TITLE", "STATUS", "TIME"], rows);
    }
    Ok(())
}

/// Parse `IMAGE:TAG:PORT`. The image itself may contain a registry port,
/// so fields are taken from the right.
pub fn parse_app_spec(spec: &str) -> anyhow::Result<Application> {
    let mut parts = spec.rsplitn(3, ':');
    let (port, tag, image) = match (parts.next(), parts.next(), parts.next()) {
        (Some(port), Some(tag), Some(image)) => (port, tag, image),
        _ => bail!("invalid application '{spec}', expected IMAGE:TAG:PORT"),
    };
    if image.is_empty() || tag.is_empty() {
        bail!("invalid application '{spec}', expected IMAGE:TAG:PORT");
    }
    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid port in '{spec}'"))?;
    Ok(Application {
        image_name: image.to_string(),
        tag: tag.to_string(),
        port,
    })
}

fn build_status_label(status: Option<BuildStatus>) -> &'static str {
    match status {
        Some(BuildStatus::Success) => "success",
        Some(BuildStatus::Failure) => "failed",
        None => "-",
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
