//! Server status and AI report commands

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::warn;

use openapi_client::models::ReportStatus;

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::models::status::{ServerStatus, StatusReport};
use crate::workers::poller::{self, Options, PollEnd, PollMode, StatusMonitor, StatusObserver, StatusSource};

/// Prints every report as it arrives
struct PrintingObserver {
    out: Output,
}

impl StatusObserver for PrintingObserver {
    fn on_status(&mut self, report: &StatusReport) {
        self.out.status_line(report);
    }

    fn on_build_finished(&mut self) {
        if !self.out.json {
            self.out.success("Server setup finished");
        }
    }

    fn on_https_finished(&mut self) {
        if !self.out.json {
            self.out.success("HTTPS conversion finished");
        }
    }
}

pub async fn show(
    app: &AppState,
    out: Output,
    project_id: u64,
    watch: bool,
    force_secs: Option<u64>,
) -> anyhow::Result<()> {
    app.require_login().await?;

    if !watch && force_secs.is_none() {
        let report: StatusReport = app
            .http_client
            .fetch_status(project_id)
            .await
            .with_context(|| format!("failed to fetch status of project {project_id}"))?;
        out.status_line(&report);
        if let Some(hint) = follow_hint(report.status) {
            if !out.json {
                println!("{}", hint);
            }
        }
        return Ok(());
    }

    let mut options = Options::new(project_id);
    options.interval = app.options.polling.interval;
    if let Some(secs) = force_secs {
        options.mode = PollMode::Forced {
            window: Duration::from_secs(secs),
        };
    }

    let mut observer = PrintingObserver { out };
    let end = poller::run(
        &options,
        app.http_client.as_ref(),
        &mut observer,
        tokio::time::sleep,
        Box::pin(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }),
    )
    .await;
    report_end(out, &end);
    Ok(())
}

/// Follow a freshly triggered job in the background until its polling
/// window ends or the user presses Ctrl-C
pub(crate) async fn follow(app: &AppState, out: Output, options: Options) -> anyhow::Result<()> {
    let mut monitor = StatusMonitor::new(app.http_client.clone() as Arc<dyn StatusSource>);
    monitor.start(options, PrintingObserver { out });

    tokio::select! {
        end = monitor.join() => {
            match end {
                Some(end) => report_end(out, &end),
                None => warn!("Status poll ended unexpectedly"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            out.alert("Stopped following, the job keeps running on the server");
        }
    }
    Ok(())
}

/// Suggest following a job that is still running on the server
fn follow_hint(status: ServerStatus) -> Option<&'static str> {
    if status.is_build_loading() {
        Some("A deployment is in progress, pass --watch to follow it")
    } else if status.is_https_loading() {
        Some("An HTTPS conversion is in progress, pass --watch to follow it")
    } else {
        None
    }
}

fn report_end(out: Output, end: &PollEnd) {
    if out.json {
        return;
    }
    match end {
        PollEnd::Terminal(report) => {
            println!("Finished: {}", report.status.info().message);
        }
        PollEnd::WindowElapsed(Some(report)) | PollEnd::Shutdown(Some(report)) => {
            println!("Last status: {}", report.status.info().message);
        }
        PollEnd::WindowElapsed(None) | PollEnd::Shutdown(None) => {
            out.alert("No status was received");
        }
    }
}

pub async fn reports(app: &AppState, out: Output, project_id: u64) -> anyhow::Result<()> {
    app.require_login().await?;
    let reports = app.http_client.ai_reports(project_id).await?;
    if out.json {
        out.print_json(&reports)?;
        return Ok(());
    }
    let rows = reports
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.build_number
                    .map(|n| format!("#{}", n))
                    .unwrap_or_else(|| "-".to_string()),
                r.title.clone(),
                report_status_label(r.status).to_string(),
                r.date.clone(),
            ]
        })
        .collect();
    out.print_table(&["ID", "BUILD", "TITLE", "STATUS", "DATE"], rows);
    Ok(())
}

pub async fn report(app: &AppState, out: Output, report_id: u64) -> anyhow::Result<()> {
    app.require_login().await?;
    let report = app.http_client.ai_report_detail(report_id).await?;
    if out.json {
        out.print_json(&report)?;
        return Ok(());
    }

    out.heading(&report.title);
    out.field("Status", report_status_label(report.status));
    if let Some(url) = &report.commit_url {
        out.field("Commit", url);
    }
    if let Some(url) = &report.merge_request_url {
        out.field("Merge request", url);
    }
    if !report.files.is_empty() {
        out.field("Files", report.files.join(", "));
    }
    println!();
    println!("{}", report.summary);
    if !report.detail.is_empty() {
        println!();
        println!("{}", report.detail);
    }
    Ok(())
}

fn report_status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Success => "fixed",
        ReportStatus::Fail => "failed",
        ReportStatus::Rejected => "rejected",
    }
}
