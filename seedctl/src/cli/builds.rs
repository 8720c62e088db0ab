//! Deployment, build history and HTTPS conversion commands

use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;

use openapi_client::models::{BuildSummary, StepStatus};

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::cli::status::follow;
use crate::http::builds::HttpsRequest;
use crate::wizard::submit::read_path;
use crate::workers::poller::{Options, PollMode};

#[derive(Subcommand)]
pub enum BuildSubcommand {
    /// Provision the project's server and run the first deployment
    Start {
        project_id: u64,
        /// PEM key of the server
        #[arg(long)]
        pem: PathBuf,
        /// Follow the deployment until the polling window ends
        #[arg(long)]
        watch: bool,
    },
    /// List builds, newest first
    List {
        project_id: u64,
        #[arg(long, default_value_t = 0)]
        start: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show the most recent build
    Last { project_id: u64 },
    /// Show the steps of one build
    Show { project_id: u64, build_number: u32 },
    /// Print the console log of a build or of one of its steps
    Log {
        project_id: u64,
        build_number: u32,
        #[arg(long)]
        step: Option<u32>,
    },
    /// Step logs of the last HTTPS conversion
    HttpsLogs { project_id: u64 },
}

/// Arguments of `seedctl https`
pub struct HttpsArgs {
    pub project_id: u64,
    pub domain: String,
    pub email: String,
    pub pem: PathBuf,
    pub host: Option<String>,
    pub watch: bool,
}

pub async fn run(app: &AppState, out: Output, subcmd: BuildSubcommand) -> anyhow::Result<()> {
    app.require_login().await?;
    match subcmd {
        BuildSubcommand::Start {
            project_id,
            pem,
            watch,
        } => start(app, out, project_id, pem, watch).await,
        BuildSubcommand::List {
            project_id,
            start,
            limit,
        } => list(app, out, project_id, start, limit).await,
        BuildSubcommand::Last { project_id } => last(app, out, project_id).await,
        BuildSubcommand::Show {
            project_id,
            build_number,
        } => show(app, out, project_id, build_number).await,
        BuildSubcommand::Log {
            project_id,
            build_number,
            step,
        } => log(app, project_id, build_number, step).await,
        BuildSubcommand::HttpsLogs { project_id } => https_logs(app, out, project_id).await,
    }
}

async fn start(
    app: &AppState,
    out: Output,
    project_id: u64,
    pem: PathBuf,
    watch: bool,
) -> anyhow::Result<()> {
    let pem = read_path(&pem).await.context("failed to read PEM key")?;
    app.http_client.start_build(project_id, pem).await?;
    out.success(&format!("Deployment of project {} started", project_id));

    if watch {
        follow(app, out, forced_options(app, project_id)).await?;
    }
    Ok(())
}

pub async fn https(app: &AppState, out: Output, args: HttpsArgs) -> anyhow::Result<()> {
    app.require_login().await?;
    let host = match args.host {
        Some(host) => host,
        None => {
            app.http_client
                .project_detail(args.project_id)
                .await
                .context("failed to look up the project's server")?
                .server_ip
        }
    };
    let pem = read_path(&args.pem)
        .await
        .context("failed to read PEM key")?;

    app.http_client
        .convert_https(HttpsRequest {
            project_id: args.project_id,
            host,
            domain: args.domain.clone(),
            email: args.email,
            pem,
        })
        .await?;
    out.success(&format!("HTTPS conversion for {} started", args.domain));

    if args.watch {
        follow(app, out, forced_options(app, args.project_id)).await?;
    }
    Ok(())
}

/// Right after a trigger the previous terminal status is still reported, so
/// polling ignores it for a while.
fn forced_options(app: &AppState, project_id: u64) -> Options {
    let mut options = Options::new(project_id);
    options.interval = app.options.polling.interval;
    options.mode = PollMode::Forced {
        window: app.options.polling.forced_window,
    };
    options
}

async fn list(
    app: &AppState,
    out: Output,
    project_id: u64,
    start: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let page = app.http_client.list_builds(project_id, start, limit).await?;
    if out.json {
        out.print_json(&page)?;
        return Ok(());
    }
    let rows = page.builds.iter().map(build_row).collect();
    out.print_table(&["#", "NAME", "DATE", "TIME", "STATUS"], rows);
    if let Some(next) = page.next_start.filter(|_| page.has_next) {
        println!("More builds: --start {}", next);
    }
    Ok(())
}

async fn last(app: &AppState, out: Output, project_id: u64) -> anyhow::Result<()> {
    let build = app.http_client.last_build(project_id).await?;
    if out.json {
        out.print_json(&build)?;
        return Ok(());
    }
    out.print_table(&["#", "NAME", "DATE", "TIME", "STATUS"], vec![build_row(&build)]);
    Ok(())
}

fn build_row(build: &BuildSummary) -> Vec<String> {
    vec![
        build.build_number.to_string(),
        build.build_name.clone(),
        build.date.clone(),
        build.time.clone(),
        build.status.clone(),
    ]
}

async fn show(app: &AppState, out: Output, project_id: u64, build_number: u32) -> anyhow::Result<()> {
    let detail = app.http_client.build_detail(project_id, build_number).await?;
    if out.json {
        out.print_json(&detail)?;
        return Ok(());
    }
    out.heading(&format!(
        "#{} {} ({})",
        detail.build_number, detail.build_name, detail.overall_status
    ));
    let rows = detail
        .step_list
        .iter()
        .map(|step| {
            vec![
                step.step_number.to_string(),
                step.step_name.clone(),
                step_status_label(step.status).to_string(),
                step.duration.clone(),
            ]
        })
        .collect();
    out.print_table(&["STEP", "NAME", "STATUS", "DURATION"], rows);
    Ok(())
}

async fn log(
    app: &AppState,
    project_id: u64,
    build_number: u32,
    step: Option<u32>,
) -> anyhow::Result<()> {
    let text = match step {
        Some(step) => app.http_client.step_log(project_id, build_number, step).await?,
        None => app.http_client.build_log(project_id, build_number).await?,
    };
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn https_logs(app: &AppState, out: Output, project_id: u64) -> anyhow::Result<()> {
    let logs = app.http_client.https_logs(project_id).await?;
    if out.json {
        out.print_json(&logs)?;
        return Ok(());
    }
    for entry in &logs {
        out.heading(&format!(
            "{}. {} ({})",
            entry.step_number, entry.step_name, entry.status
        ));
        println!("{}", entry.log_content.trim_end());
    }
    Ok(())
}

fn step_status_label(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Success => "success",
        StepStatus::Fail => "failed",
        StepStatus::Unknown => "-",
    }
}
