//! Command-line surface
//!
//! Each area of the platform has its own subcommand enum and a `run`
//! function. Handlers return `anyhow::Result` so context can be attached
//! before the error reaches `main`.

pub mod account;
pub mod auth;
pub mod builds;
pub mod projects;
pub mod registry;
pub mod status;
pub mod wizard;

use clap::{Parser, Subcommand};

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::logs::LogLevel;
use crate::utils::version_info;

#[derive(Parser)]
#[command(
    name = "seedctl",
    about = "Command-line client for the SEED deployment platform",
    version
)]
pub struct Cli {
    /// Backend base URL, including the `/api` prefix
    #[arg(long, global = true, env = "SEED_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the tokens issued by the OAuth callback
    Login {
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        refresh_token: String,
    },
    /// Log out and forget the local session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Fetch the profile again instead of using the cached one
        #[arg(long)]
        refresh: bool,
    },
    /// Register a GitLab personal access token
    Pat { token: String },

    /// List your projects
    Projects {
        /// Ignore the cached list
        #[arg(long)]
        refresh: bool,
    },
    /// Inspect or change one project
    Project {
        #[command(subcommand)]
        subcommand: projects::ProjectSubcommand,
    },
    /// Build and HTTPS status of every project
    Overview,
    /// Recent builds, deploys and HTTPS conversions
    Executions,

    /// Create a project step by step
    Wizard {
        #[command(subcommand)]
        subcommand: wizard::WizardSubcommand,
    },

    /// List GitLab repositories
    Repos,
    /// Search Docker Hub images
    Images { keyword: String },
    /// List tags of a Docker Hub image
    Tags { image: String },
    /// Search application templates
    Apps { keyword: String },

    /// Jenkins builds and server provisioning
    Build {
        #[command(subcommand)]
        subcommand: builds::BuildSubcommand,
    },
    /// Convert a deployed project to HTTPS
    Https {
        project_id: u64,
        #[arg(long)]
        domain: String,
        #[arg(long)]
        email: String,
        /// PEM key of the server
        #[arg(long)]
        pem: std::path::PathBuf,
        /// Server address, defaults to the project's server IP
        #[arg(long)]
        host: Option<String>,
        /// Follow the conversion until the polling window ends
        #[arg(long)]
        watch: bool,
    },
    /// Show or follow the deployment status of a project
    Status {
        project_id: u64,
        /// Keep polling until a terminal status is reached
        #[arg(long)]
        watch: bool,
        /// Poll for this many seconds, ignoring terminal statuses
        #[arg(long, value_name = "SECS")]
        force_secs: Option<u64>,
    },
    /// AI reports of a project
    Reports { project_id: u64 },
    /// Show one AI report
    Report { report_id: u64 },

    /// List notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Act on one notification
    Notification {
        #[command(subcommand)]
        subcommand: account::NotificationSubcommand,
    },
    /// Answer a project invitation
    Invite {
        #[command(subcommand)]
        subcommand: account::InviteSubcommand,
    },
    /// Manage push notification tokens
    Fcm {
        #[command(subcommand)]
        subcommand: account::FcmSubcommand,
    },
    /// Show or change the color theme
    Theme {
        /// light, dark or toggle
        mode: Option<String>,
    },
    /// Print version information
    Version,
}

/// Route a parsed command to its handler
pub async fn dispatch(command: Commands, app: &AppState, out: Output) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            access_token,
            refresh_token,
        } => auth::login(app, out, access_token, refresh_token).await,
        Commands::Logout => auth::logout(app, out).await,
        Commands::Whoami { refresh } => auth::whoami(app, out, refresh).await,
        Commands::Pat { token } => auth::register_pat(app, out, &token).await,

        Commands::Projects { refresh } => projects::list(app, out, refresh).await,
        Commands::Project { subcommand } => projects::run(app, out, subcommand).await,
        Commands::Overview => projects::overview(app, out).await,
        Commands::Executions => projects::executions(app, out).await,

        Commands::Wizard { subcommand } => wizard::run(app, out, subcommand).await,

        Commands::Repos => registry::repositories(app, out).await,
        Commands::Images { keyword } => registry::images(app, out, &keyword).await,
        Commands::Tags { image } => registry::tags(app, out, &image).await,
        Commands::Apps { keyword } => registry::applications(app, out, &keyword).await,

        Commands::Build { subcommand } => builds::run(app, out, subcommand).await,
        Commands::Https {
            project_id,
            domain,
            email,
            pem,
            host,
            watch,
        } => {
            builds::https(
                app,
                out,
                builds::HttpsArgs {
                    project_id,
                    domain,
                    email,
                    pem,
                    host,
                    watch,
                },
            )
            .await
        }
        Commands::Status {
            project_id,
            watch,
            force_secs,
        } => status::show(app, out, project_id, watch, force_secs).await,
        Commands::Reports { project_id } => status::reports(app, out, project_id).await,
        Commands::Report { report_id } => status::report(app, out, report_id).await,

        Commands::Notifications { unread, page, size } => {
            account::notifications(app, out, unread, page, size).await
        }
        Commands::Notification { subcommand } => account::notification(app, out, subcommand).await,
        Commands::Invite { subcommand } => account::invite(app, out, subcommand).await,
        Commands::Fcm { subcommand } => account::fcm(app, out, subcommand).await,
        Commands::Theme { mode } => account::theme(app, out, mode.as_deref()).await,
        Commands::Version => {
            let info = version_info();
            if out.json {
                out.print_json(&info)?;
            } else {
                println!("seedctl {} ({}, built {})", info.version, info.git_hash, info.build_time);
            }
            Ok(())
        }
    }
}
