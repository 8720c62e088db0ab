//! Step-by-step project creation

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use tracing::debug;

use openapi_client::models::{ApplicationTemplate, RepoStructure};

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::stores::wizard::WizardStore;
use crate::utils::parse_repo_name;
use crate::wizard::state::Attachment;
use crate::wizard::steps::STEPS;
use crate::wizard::submit::submit;

#[derive(Clone, Copy, ValueEnum)]
pub enum StructureArg {
    Mono,
    Multi,
}

impl From<StructureArg> for RepoStructure {
    fn from(arg: StructureArg) -> Self {
        match arg {
            StructureArg::Mono => RepoStructure::Mono,
            StructureArg::Multi => RepoStructure::Multi,
        }
    }
}

#[derive(Subcommand)]
pub enum WizardSubcommand {
    /// Show the collected values and the current step
    Status,
    /// Step 1: repository and layout
    SetSource {
        /// GitLab project ID; fills URL and branch from your repositories
        #[arg(long)]
        gitlab_id: Option<u64>,
        #[arg(long)]
        repo_url: Option<String>,
        #[arg(long)]
        default_branch: Option<String>,
        #[arg(long, value_enum)]
        structure: Option<StructureArg>,
        /// Frontend directory (mono) or branch (multi)
        #[arg(long)]
        client: Option<String>,
        /// Backend directory (mono) or branch (multi)
        #[arg(long)]
        server: Option<String>,
    },
    /// Step 2: server address and PEM key
    SetServer {
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        pem: Option<PathBuf>,
    },
    /// Step 3: add an application image
    AddApp {
        image: String,
        /// Defaults to the newest tag on Docker Hub
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Step 3: change an application's tag or port
    SetApp {
        image: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Step 3: remove an application image
    RemoveApp { image: String },
    /// Step 4: build environment
    SetEnv {
        #[arg(long)]
        framework: Option<String>,
        #[arg(long)]
        node: Option<String>,
        #[arg(long)]
        jdk: Option<String>,
        #[arg(long)]
        build_tool: Option<String>,
        /// Frontend .env file
        #[arg(long)]
        front_env: Option<PathBuf>,
        /// Backend .env file
        #[arg(long)]
        back_env: Option<PathBuf>,
    },
    /// Validate the current step and advance
    Next,
    /// Go back one step
    Prev,
    /// Jump to a step by slug (gitlab, server, app, env, complete)
    Goto { slug: String },
    /// Create the project from the collected values
    Submit,
    /// Discard everything collected so far
    Reset,
    /// Start from an existing project's configuration
    Load { project_id: u64 },
}

pub async fn run(app: &AppState, out: Output, subcmd: WizardSubcommand) -> anyhow::Result<()> {
    let mut store = app.wizard_store().await;
    match subcmd {
        WizardSubcommand::Status => {
            print_status(&store, out)?;
            return Ok(());
        }
        WizardSubcommand::SetSource {
            gitlab_id,
            repo_url,
            default_branch,
            structure,
            client,
            server,
        } => {
            let mut source = store.state().source.clone();
            if let Some(id) = gitlab_id {
                source.gitlab_id = id;
                if repo_url.is_none() {
                    app.require_login().await?;
                    let repos = app.http_client.all_repositories().await?;
                    let repo = repos
                        .iter()
                        .find(|r| r.id == id)
                        .with_context(|| format!("repository {id} not found in GitLab"))?;
                    source.repo_url = repo.http_url_to_repo.clone();
                    if let Some(branch) = &repo.default_branch {
                        source.default_branch = branch.clone();
                    }
                }
            }
            if let Some(url) = repo_url {
                source.repo_url = url;
            }
            if let Some(branch) = default_branch {
                source.default_branch = branch;
            }
            store.set_source(source);
            if let Some(structure) = structure {
                store.set_structure(structure.into());
            }

            let mut source = store.state().source.clone();
            if let Some(client) = client {
                source.client_name = client;
            }
            if let Some(server) = server {
                source.server_name = server;
            }
            store.set_source(source);
        }
        WizardSubcommand::SetServer { ip, pem } => {
            let mut server = store.state().server.clone();
            if let Some(ip) = ip {
                server.ip = ip;
            }
            if let Some(pem) = pem {
                server.pem = Some(local_attachment(pem)?);
            }
            store.set_server(server);
        }
        WizardSubcommand::AddApp { image, tag, port } => {
            app.require_login().await?;
            let template = find_template(app, &image).await?;
            let tag = match tag {
                Some(tag) => tag,
                None => newest_tag(app, &image).await?,
            };
            let index = store.add_app(&template, &tag);
            if let Some(port) = port {
                store.set_app_port(index, port)?;
            }
        }
        WizardSubcommand::SetApp { image, tag, port } => {
            let index = app_index(&store, &image)?;
            if let Some(tag) = tag {
                store.set_app_tag(index, &tag)?;
            }
            if let Some(port) = port {
                store.set_app_port(index, port)?;
            }
        }
        WizardSubcommand::RemoveApp { image } => {
            let index = app_index(&store, &image)?;
            store.remove_app(index);
        }
        WizardSubcommand::SetEnv {
            framework,
            node,
            jdk,
            build_tool,
            front_env,
            back_env,
        } => {
            let mut env = store.state().env.clone();
            if let Some(framework) = framework {
                env.frontend_framework = framework;
            }
            if let Some(node) = node {
                env.node = node;
            }
            if let Some(jdk) = jdk {
                env.jdk = jdk;
            }
            if let Some(build_tool) = build_tool {
                env.build_tool = build_tool;
            }
            if let Some(path) = front_env {
                env.front_env = Some(local_attachment(path)?);
            }
            if let Some(path) = back_env {
                env.back_env = Some(local_attachment(path)?);
            }
            store.set_env(env);
        }
        WizardSubcommand::Next => {
            let step = store.next()?;
            debug!("Wizard moved to {}", step.slug);
        }
        WizardSubcommand::Prev => {
            store.prev();
        }
        WizardSubcommand::Goto { slug } => {
            if let Err(e) = store.goto(&slug) {
                store.save().await?;
                return Err(e.into());
            }
        }
        WizardSubcommand::Submit => {
            app.require_login().await?;
            let created = submit(&mut store, &app.http_client)
                .await
                .context("project creation failed, the wizard was kept")?;
            app.project_store().await.invalidate().await?;
            match created {
                Some(project) if out.json => out.print_json(&project)?,
                Some(project) => out.success(&format!(
                    "Project {} created (id {})",
                    project.project_name, project.id
                )),
                None => out.success("Project created"),
            }
            return Ok(());
        }
        WizardSubcommand::Reset => {
            store.reset().await?;
            out.success("Wizard cleared");
            return Ok(());
        }
        WizardSubcommand::Load { project_id } => {
            app.require_login().await?;
            let detail = app.http_client.project_detail(project_id).await?;
            store.load_from_detail(&detail);
        }
    }

    store.save().await.context("failed to save wizard state")?;
    print_status(&store, out)
}

fn local_attachment(path: PathBuf) -> anyhow::Result<Attachment> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(Attachment::local(path))
}

fn app_index(store: &WizardStore, image: &str) -> anyhow::Result<usize> {
    store
        .app_index(image)
        .with_context(|| format!("application '{image}' has not been added"))
}

/// Template for `image`, or a bare one when the catalogue has none
async fn find_template(app: &AppState, image: &str) -> anyhow::Result<ApplicationTemplate> {
    let templates = app.http_client.search_applications(image).await?;
    Ok(templates
        .into_iter()
        .find(|t| t.image_name == image)
        .unwrap_or_else(|| ApplicationTemplate {
            image_name: image.to_string(),
            default_ports: vec![],
            description: String::new(),
            image_envs: vec![],
        }))
}

async fn newest_tag(app: &AppState, image: &str) -> anyhow::Result<String> {
    let tags = app.http_client.image_tags(image).await?;
    Ok(tags
        .into_iter()
        .next()
        .map(|t| t.name)
        .unwrap_or_else(|| "latest".to_string()))
}

fn print_status(store: &WizardStore, out: Output) -> anyhow::Result<()> {
    let state = store.state();
    let wizard = store.wizard();
    if out.json {
        out.print_json(&serde_json::json!({
            "step": wizard.current_id(),
            "slug": wizard.current().slug,
            "progress": wizard.progress_percent(),
            "state": state,
        }))?;
        return Ok(());
    }

    let steps: Vec<String> = STEPS
        .iter()
        .map(|s| {
            if s.id == wizard.current_id() {
                format!("[{}]", s.label)
            } else {
                s.label.to_string()
            }
        })
        .collect();
    out.heading(&format!(
        "Step {}/{} ({}%)",
        wizard.current_id(),
        STEPS.len(),
        wizard.progress_percent()
    ));
    println!("{}", steps.join(" > "));

    let source = &state.source;
    let (client_label, server_label) = match source.structure {
        RepoStructure::Mono => ("Frontend dir", "Backend dir"),
        RepoStructure::Multi => ("Frontend", "Backend"),
    };
    out.field("Repository", or_dash(&parse_repo_name(&source.repo_url)));
    out.field("Branch", or_dash(&source.default_branch));
    out.field(client_label, or_dash(&source.client_name));
    out.field(server_label, or_dash(&source.server_name));
    out.field("Server IP", or_dash(&state.server.ip));
    out.field(
        "PEM key",
        state.server.pem.as_ref().map_or("-", |a| a.name.as_str()),
    );
    for entry in &state.apps {
        out.field(
            "Application",
            format!("{}:{} on {}", entry.image_name, entry.tag, entry.port),
        );
    }
    out.field(
        "Environment",
        format!(
            "{}, Node {}, JDK {} ({})",
            state.env.frontend_framework, state.env.node, state.env.jdk, state.env.build_tool
        ),
    );
    out.field(
        "Frontend .env",
        state.env.front_env.as_ref().map_or("-", |a| a.name.as_str()),
    );
    out.field(
        "Backend .env",
        state.env.back_env.as_ref().map_or("-", |a| a.name.as_str()),
    );

    if let Err(e) = (wizard.current().validate)(state) {
        out.alert(&format!("Before continuing: {}", e));
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
