//! seedctl - Entry Point
//!
//! Command-line client for the SEED deployment platform.

use clap::Parser;
use tracing::debug;

use seedctl::app::options::{AppOptions, Overrides};
use seedctl::app::output::Output;
use seedctl::app::state::{load_settings, AppState};
use seedctl::cli::{dispatch, Cli};
use seedctl::logs::{init_logging, LogOptions};
use seedctl::storage::layout::StorageLayout;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let layout = StorageLayout::from_env();
    layout.setup().await?;

    let settings = load_settings(&layout).await;
    let options = AppOptions::resolve(
        settings,
        Overrides {
            backend_url: cli.backend_url,
            log_level: cli.log_level,
            json: cli.json,
            no_color: cli.no_color,
        },
    );

    // Hold the guard so buffered file logs are flushed on exit
    let _guard = match init_logging(LogOptions {
        log_level: options.log_level.clone(),
        log_dir: Some(layout.logs_dir().path().to_path_buf()),
        ..Default::default()
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };
    debug!("Running with options: {:?}", options);

    let app = AppState::init(layout, options).await?;
    let theme = app.theme_store().await.effective_mode();
    let out = Output::new(app.options.json, app.options.color, theme);

    dispatch(cli.command, &app, out).await
}
