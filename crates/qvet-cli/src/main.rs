//! qvet CLI - Deployment readiness for GitHub repositories
//!
//! This CLI lets developers and deployers:
//! - See whether the undeployed commits of a repository can be deployed
//! - Record QA decisions on individual commits
//! - Place and lift embargoes, and leave deployment notes
//! - Tick routine checks and overrule failing check-runs
//! - Validate the repository policy (`qvet.yml`)

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod commands;
mod output;
mod settings;

use app::App;
use commands::{active, commits, config, overrule, qa, routine, status, whoami};
use settings::{LoggingSettings, Overrides, Settings};

/// qvet CLI application
#[derive(Parser)]
#[command(name = "qvet")]
#[command(about = "qvet - Deployment readiness for GitHub repositories", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file path (TOML)
    #[arg(short, long, env = "QVET_CONFIG", global = true)]
    config: Option<String>,

    /// Repository as owner/repo
    #[arg(short, long, global = true)]
    repo: Option<String>,

    /// GitHub token
    #[arg(long, global = true)]
    token: Option<String>,

    /// GitHub API URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter, e.g. `info` or `qvet_github=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Show whether the repository is ready to deploy
    Status {
        /// Exit with an error unless ready
        #[arg(long)]
        fail_unless_ready: bool,
    },

    /// List undeployed commits with their QA state
    Commits {
        /// Include commits hidden by ignore rules
        #[arg(short, long)]
        all: bool,
    },

    /// Record a QA decision on a commit
    Qa {
        /// Commit sha, abbreviated if unambiguous
        sha: String,

        decision: qa::QaDecision,

        /// Description instead of the generated one
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Manage embargoes
    Embargo {
        #[command(subcommand)]
        command: active::EmbargoCommands,
    },

    /// Manage deployment notes
    Note {
        #[command(subcommand)]
        command: active::NoteCommands,
    },

    /// Manage routine checks
    Routine {
        #[command(subcommand)]
        command: routine::RoutineCommands,
    },

    /// Overrule failing check-runs
    Overrule {
        #[command(subcommand)]
        command: overrule::OverruleCommands,
    },

    /// Inspect the repository policy
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// Show the authenticated user
    Whoami,
}

fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?.apply(Overrides {
        token: cli.token,
        repo: cli.repo,
        api_url: cli.api_url,
        log_level: cli.log_level.or_else(|| cli.verbose.then(|| "debug".to_string())),
        json_logs: cli.json_logs,
    });
    init_tracing(&settings.logging);

    let format = cli.output;
    let app = || App::new(&settings, format);
    match cli.command {
        Commands::Status { fail_unless_ready } => status::execute(&app()?, fail_unless_ready).await,
        Commands::Commits { all } => commits::execute(&app()?, all).await,
        Commands::Qa {
            sha,
            decision,
            description,
        } => qa::execute(&app()?, &sha, decision, description).await,
        Commands::Embargo { command } => active::execute_embargo(command, &app()?).await,
        Commands::Note { command } => active::execute_note(command, &app()?).await,
        Commands::Routine { command } => routine::execute(command, &app()?).await,
        Commands::Overrule { command } => overrule::execute(command, &app()?).await,
        Commands::Config { command } => config::execute(command, &settings, format).await,
        Commands::Whoami => whoami::execute(&app()?).await,
    }
}
