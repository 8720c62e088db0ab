//! Polling worker for project deployment status

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::SeedError;
use crate::http::HttpClient;
use crate::models::status::{ServerStatus, StatusReport};

/// Where status reports come from
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, project_id: u64) -> Result<StatusReport, SeedError>;
}

#[async_trait]
impl StatusSource for HttpClient {
    async fn fetch_status(&self, project_id: u64) -> Result<StatusReport, SeedError> {
        Ok(self.project_status(project_id).await?.into())
    }
}

/// When polling stops on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Stop at the first terminal status
    UntilTerminal,
    /// Ignore terminal statuses and poll for a fixed window. Used right after
    /// triggering a build, when the old terminal status is still reported.
    Forced { window: Duration },
}

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    pub project_id: u64,

    /// Polling interval
    pub interval: Duration,

    pub mode: PollMode,
}

impl Options {
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            interval: Duration::from_secs(3),
            mode: PollMode::UntilTerminal,
        }
    }
}

/// Receives what the poller sees
pub trait StatusObserver: Send {
    fn on_status(&mut self, _report: &StatusReport) {}

    /// Called at most once per run, when FINISH is seen
    fn on_build_finished(&mut self) {}

    /// Called at most once per run, when FINISH_CONVERT_HTTPS is seen
    fn on_https_finished(&mut self) {}
}

impl StatusObserver for () {}

/// Why a poll run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEnd {
    Terminal(StatusReport),
    WindowElapsed(Option<StatusReport>),
    Shutdown(Option<StatusReport>),
}

/// Run the poller worker.
///
/// Fetches immediately, then once per interval. Fetch errors are logged and
/// retried on the next tick.
pub async fn run<O, S, F>(
    options: &Options,
    source: &dyn StatusSource,
    observer: &mut O,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> PollEnd
where
    O: StatusObserver + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!(
        "Status poller starting for project {} ({:?})",
        options.project_id, options.mode
    );

    let mut build_finished = false;
    let mut https_finished = false;
    let mut last: Option<StatusReport> = None;
    let mut ticks: u32 = 0;

    loop {
        match source.fetch_status(options.project_id).await {
            Ok(report) => {
                debug!("Project {} status: {}", options.project_id, report.code);
                observer.on_status(&report);

                if report.status == ServerStatus::Finish && !build_finished {
                    build_finished = true;
                    observer.on_build_finished();
                }
                if report.status == ServerStatus::FinishConvertHttps && !https_finished {
                    https_finished = true;
                    observer.on_https_finished();
                }

                if options.mode == PollMode::UntilTerminal && report.status.is_terminal() {
                    info!("Status poller stopped on {}", report.code);
                    return PollEnd::Terminal(report);
                }
                last = Some(report);
            }
            Err(e) => {
                error!("Failed to fetch status of project {}: {}", options.project_id, e);
            }
        }

        if let PollMode::Forced { window } = options.mode {
            if options.interval.saturating_mul(ticks) >= window || options.interval.is_zero() {
                info!("Status poller window of {:?} elapsed", window);
                return PollEnd::WindowElapsed(last);
            }
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Status poller shutting down...");
                return PollEnd::Shutdown(last);
            }
            _ = sleep_fn(options.interval) => {}
        }
        ticks = ticks.saturating_add(1);
    }
}

/// Forwards reports to a watch channel before the wrapped observer
struct Publishing<O> {
    tx: Arc<watch::Sender<Option<StatusReport>>>,
    inner: O,
}

impl<O: StatusObserver> StatusObserver for Publishing<O> {
    fn on_status(&mut self, report: &StatusReport) {
        self.tx.send_replace(Some(report.clone()));
        self.inner.on_status(report);
    }

    fn on_build_finished(&mut self) {
        self.inner.on_build_finished();
    }

    fn on_https_finished(&mut self) {
        self.inner.on_https_finished();
    }
}

/// Keeps at most one poll running and publishes the latest status
pub struct StatusMonitor {
    source: Arc<dyn StatusSource>,
    tx: Arc<watch::Sender<Option<StatusReport>>>,
    handle: Option<JoinHandle<PollEnd>>,
}

impl StatusMonitor {
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            source,
            tx: Arc::new(tx),
            handle: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusReport>> {
        self.tx.subscribe()
    }

    /// Latest status seen by any run
    pub fn latest(&self) -> Option<StatusReport> {
        self.tx.borrow().clone()
    }

    /// Start polling, cancelling any poll already running
    pub fn start<O>(&mut self, options: Options, observer: O)
    where
        O: StatusObserver + 'static,
    {
        self.stop();

        let source = self.source.clone();
        let mut observer = Publishing {
            tx: self.tx.clone(),
            inner: observer,
        };
        self.handle = Some(tokio::spawn(async move {
            run(
                &options,
                source.as_ref(),
                &mut observer,
                tokio::time::sleep,
                Box::pin(std::future::pending()),
            )
            .await
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Cancelling previous status poll");
            handle.abort();
        }
    }

    /// Wait for the current run to end on its own
    pub async fn join(&mut self) -> Option<PollEnd> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
