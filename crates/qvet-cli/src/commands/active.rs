//! Embargoes and deployment notes on the base commit

use crate::app::App;
use crate::output::{self, print_success, print_warning, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use qvet_status::{decode_active_by_kind, random_hex_id, ActiveEntry, ActiveKind};
use qvet_types::Status;
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

/// Embargo subcommands
#[derive(Subcommand)]
pub enum EmbargoCommands {
    /// List active embargoes
    List,

    /// Block deployment until resolved
    Add {
        /// Why deployment is blocked
        #[arg(short, long)]
        reason: String,
    },

    /// Lift an embargo
    Resolve {
        /// Embargo ID
        id: String,
    },
}

/// Deployment note subcommands
#[derive(Subcommand)]
pub enum NoteCommands {
    /// List active deployment notes
    List,

    /// Leave a note for whoever deploys next
    Add {
        /// Note text
        #[arg(short, long)]
        message: String,
    },

    /// Remove a note
    Resolve {
        /// Note ID
        id: String,
    },
}

/// Table row for active entries
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    id: String,
    text: String,
    by: String,
    since: String,
}

impl From<&ActiveEntry> for EntryRow {
    fn from(entry: &ActiveEntry) -> Self {
        Self {
            id: entry.id.clone(),
            text: entry.status.description.clone().unwrap_or_default(),
            by: entry
                .status
                .creator
                .as_ref()
                .map(|creator| creator.login.clone())
                .unwrap_or_else(|| "-".to_string()),
            since: entry.status.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn execute_embargo(command: EmbargoCommands, app: &App) -> Result<()> {
    let meta = app.config_meta().await?;
    let sha = app.base_sha(&meta).await?;

    match command {
        EmbargoCommands::List => list(app, &sha, ActiveKind::Embargo).await,
        EmbargoCommands::Add { reason } => {
            let id = random_hex_id(&mut rand::thread_rng());
            let status = app.writer().await?.add_embargo(&sha, &id, &reason).await?;
            report(app, &format!("Embargo {} added", id), &status)
        }
        EmbargoCommands::Resolve { id } => {
            warn_if_inactive(app, &sha, ActiveKind::Embargo, &id).await;
            let status = app.writer().await?.resolve_embargo(&sha, &id).await?;
            report(app, &format!("Embargo {} resolved", id), &status)
        }
    }
}

pub async fn execute_note(command: NoteCommands, app: &App) -> Result<()> {
    let meta = app.config_meta().await?;
    let sha = app.base_sha(&meta).await?;

    match command {
        NoteCommands::List => list(app, &sha, ActiveKind::DeploymentNote).await,
        NoteCommands::Add { message } => {
            let id = random_hex_id(&mut rand::thread_rng());
            let status = app
                .writer()
                .await?
                .add_deployment_note(&sha, &id, &message)
                .await?;
            report(app, &format!("Note {} added", id), &status)
        }
        NoteCommands::Resolve { id } => {
            warn_if_inactive(app, &sha, ActiveKind::DeploymentNote, &id).await;
            let status = app
                .writer()
                .await?
                .resolve_deployment_note(&sha, &id)
                .await?;
            report(app, &format!("Note {} resolved", id), &status)
        }
    }
}

async fn active(app: &App, sha: &str, kind: ActiveKind) -> Result<Vec<ActiveEntry>> {
    let statuses = app.statuses(sha).await?;
    Ok(decode_active_by_kind(sha, &statuses, kind))
}

async fn list(app: &App, sha: &str, kind: ActiveKind) -> Result<()> {
    let entries = active(app, sha, kind).await?;
    match app.output {
        OutputFormat::Table => {
            output::print_output(entries.iter().map(EntryRow::from).collect(), app.output)
        }
        format => output::print_single(&entries, format),
    }
}

/// Resolving never depends on reading statuses; an unknown id or a failed
/// read only produces a warning before the write goes out.
async fn warn_if_inactive(app: &App, sha: &str, kind: ActiveKind, id: &str) {
    let noun = match kind {
        ActiveKind::Embargo => "embargo",
        ActiveKind::DeploymentNote => "deployment note",
    };
    match active(app, sha, kind).await {
        Ok(entries) if !entries.iter().any(|entry| entry.id == id) => {
            warn!(sha = %sha, id = %id, "Resolving {} that is not active", noun);
            if matches!(app.output, OutputFormat::Table) {
                print_warning(&format!("No active {} with id {}", noun, id));
            }
        }
        Ok(_) => {}
        Err(e) => warn!(sha = %sha, id = %id, error = %e, "Cannot check active {}s", noun),
    }
}

fn report(app: &App, message: &str, status: &Status) -> Result<()> {
    match app.output {
        OutputFormat::Table => {
            print_success(message);
            Ok(())
        }
        format => output::print_single(status, format),
    }
}
