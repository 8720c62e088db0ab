//! Status poller tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use seedctl::errors::SeedError;
use seedctl::models::status::{ServerStatus, StatusReport};
use seedctl::workers::poller::{
    self, Options, PollEnd, PollMode, StatusMonitor, StatusObserver, StatusSource,
};

/// Replays a fixed list of codes, repeating the last one
struct ScriptedSource {
    codes: Mutex<VecDeque<&'static str>>,
    fetched_at: Mutex<Vec<Instant>>,
}

impl ScriptedSource {
    fn new(codes: &[&'static str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().copied().collect()),
            fetched_at: Mutex::new(Vec::new()),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetched_at.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, _project_id: u64) -> Result<StatusReport, SeedError> {
        self.fetched_at.lock().unwrap().push(Instant::now());
        let mut codes = self.codes.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            *codes.front().unwrap()
        };
        if code == "ERROR" {
            return Err(SeedError::HttpStatus {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(StatusReport {
            status: ServerStatus::from_code(code),
            code: code.to_string(),
            is_server_live: true,
        })
    }
}

#[derive(Default)]
struct Recorder {
    codes: Vec<String>,
    build_finished: usize,
    https_finished: usize,
}

impl StatusObserver for Recorder {
    fn on_status(&mut self, report: &StatusReport) {
        self.codes.push(report.code.clone());
    }

    fn on_build_finished(&mut self) {
        self.build_finished += 1;
    }

    fn on_https_finished(&mut self) {
        self.https_finished += 1;
    }
}

async fn run_with_recorded_sleeps(
    options: &Options,
    source: &ScriptedSource,
    observer: &mut Recorder,
) -> (PollEnd, Vec<Duration>) {
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorded = sleeps.clone();
    let end = poller::run(
        options,
        source,
        observer,
        move |d| {
            recorded.lock().unwrap().push(d);
            std::future::ready(())
        },
        Box::pin(std::future::pending()),
    )
    .await;
    let sleeps = sleeps.lock().unwrap().clone();
    (end, sleeps)
}

#[tokio::test]
async fn test_stops_at_first_terminal_status() {
    let source = ScriptedSource::new(&["UPDATE_PACKAGE", "INSTALL_DOCKER", "FINISH", "INIT"]);
    let mut observer = Recorder::default();

    let (end, sleeps) =
        run_with_recorded_sleeps(&Options::new(1), &source, &mut observer).await;

    match end {
        PollEnd::Terminal(report) => assert_eq!(report.status, ServerStatus::Finish),
        other => panic!("unexpected end: {:?}", other),
    }
    assert_eq!(source.fetch_count(), 3);
    assert_eq!(sleeps, vec![Duration::from_secs(3); 2]);
    assert_eq!(observer.codes, ["UPDATE_PACKAGE", "INSTALL_DOCKER", "FINISH"]);
    assert_eq!(observer.build_finished, 1);
    assert_eq!(observer.https_finished, 0);
}

#[tokio::test]
async fn test_fetch_errors_do_not_stop_polling() {
    let source = ScriptedSource::new(&["ERROR", "ERROR", "FAIL"]);
    let mut observer = Recorder::default();

    let (end, _) = run_with_recorded_sleeps(&Options::new(1), &source, &mut observer).await;

    assert!(matches!(end, PollEnd::Terminal(ref r) if r.status == ServerStatus::Fail));
    assert_eq!(source.fetch_count(), 3);
    assert_eq!(observer.codes, ["FAIL"]);
}

#[tokio::test]
async fn test_unknown_codes_keep_polling() {
    let source = ScriptedSource::new(&["SOMETHING_NEW", "FINISH_CONVERT_HTTPS"]);
    let mut observer = Recorder::default();

    let (end, _) = run_with_recorded_sleeps(&Options::new(1), &source, &mut observer).await;

    assert!(matches!(end, PollEnd::Terminal(_)));
    assert_eq!(observer.codes, ["SOMETHING_NEW", "FINISH_CONVERT_HTTPS"]);
    assert_eq!(observer.https_finished, 1);
}

#[tokio::test]
async fn test_forced_mode_ignores_terminal_statuses_for_the_window() {
    // The first reports still show the previous run's FINISH
    let source = ScriptedSource::new(&["FINISH", "FINISH", "INIT", "SET_SWAP_MEMORY"]);
    let mut observer = Recorder::default();
    let mut options = Options::new(1);
    options.mode = PollMode::Forced {
        window: Duration::from_secs(9),
    };

    let (end, sleeps) = run_with_recorded_sleeps(&options, &source, &mut observer).await;

    match end {
        PollEnd::WindowElapsed(Some(report)) => {
            assert_eq!(report.status, ServerStatus::SetSwapMemory)
        }
        other => panic!("unexpected end: {:?}", other),
    }
    // Fetches at 0, 3, 6 and 9 seconds
    assert_eq!(source.fetch_count(), 4);
    assert_eq!(sleeps.len(), 3);
    assert_eq!(observer.build_finished, 1);
}

#[tokio::test]
async fn test_shutdown_signal_ends_the_run() {
    let source = ScriptedSource::new(&["INSTALL_JENKINS"]);
    let mut observer = Recorder::default();

    let end = poller::run(
        &Options::new(1),
        &source,
        &mut observer,
        |_| std::future::pending::<()>(),
        Box::pin(async {}),
    )
    .await;

    match end {
        PollEnd::Shutdown(Some(report)) => assert_eq!(report.code, "INSTALL_JENKINS"),
        other => panic!("unexpected end: {:?}", other),
    }
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_monitor_polls_every_three_seconds() {
    let source = Arc::new(ScriptedSource::new(&["SET_SWAP_MEMORY", "INSTALL_JDK", "FINISH"]));
    let mut monitor = StatusMonitor::new(source.clone() as Arc<dyn StatusSource>);
    let started = Instant::now();

    monitor.start(Options::new(7), ());
    let end = monitor.join().await;

    assert!(matches!(end, Some(PollEnd::Terminal(_))));
    let offsets: Vec<Duration> = source
        .fetched_at
        .lock()
        .unwrap()
        .iter()
        .map(|t| t.duration_since(started))
        .collect();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_secs(3),
            Duration::from_secs(6)
        ]
    );
    assert_eq!(
        monitor.latest().map(|r| r.status),
        Some(ServerStatus::Finish)
    );
    assert!(!monitor.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_monitor_restart_cancels_previous_run() {
    let first = Arc::new(ScriptedSource::new(&["INSTALL_DOCKER"]));
    let mut monitor = StatusMonitor::new(first.clone() as Arc<dyn StatusSource>);
    let mut updates = monitor.subscribe();

    monitor.start(Options::new(1), ());
    updates.changed().await.unwrap();
    assert!(monitor.is_running());

    let mut options = Options::new(1);
    options.mode = PollMode::Forced {
        window: Duration::from_secs(3),
    };
    monitor.start(options, ());
    let end = monitor.join().await;

    assert!(matches!(end, Some(PollEnd::WindowElapsed(Some(_)))));
    tokio::time::advance(Duration::from_secs(30)).await;
    // The aborted run stopped fetching: one fetch from the first run, two
    // from the forced run.
    assert_eq!(first.fetch_count(), 3);
}
