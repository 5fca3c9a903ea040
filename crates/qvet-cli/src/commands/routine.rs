//! Routine checks on the base commit

use crate::app::App;
use crate::output::{self, print_success, OutputFormat};
use anyhow::{bail, Result};
use clap::Subcommand;
use qvet_status::{StatusContext, WriteableState};
use serde::Serialize;
use tabled::Tabled;

/// Routine check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoutineState {
    Complete,
    Reject,
    Reset,
}

impl From<RoutineState> for WriteableState {
    fn from(state: RoutineState) -> Self {
        match state {
            RoutineState::Complete => WriteableState::Success,
            RoutineState::Reject => WriteableState::Failure,
            RoutineState::Reset => WriteableState::Pending,
        }
    }
}

/// Routine check subcommands
#[derive(Subcommand)]
pub enum RoutineCommands {
    /// List configured routine checks with their state
    List,

    /// Record the outcome of a routine check
    Set {
        /// Routine check ID from the policy
        id: String,

        state: RoutineState,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct RoutineRow {
    id: String,
    text: String,
    state: String,
    by: String,
}

pub async fn execute(command: RoutineCommands, app: &App) -> Result<()> {
    let meta = app.config_meta().await?;
    let sha = app.base_sha(&meta).await?;
    let checks = &meta.config().routine_checks;

    match command {
        RoutineCommands::List => {
            let statuses = app.statuses(&sha).await?;
            let rows: Vec<RoutineRow> = checks
                .iter()
                .map(|check| {
                    let latest = statuses.latest(&StatusContext::routine_check(check.id.as_str()));
                    RoutineRow {
                        id: check.id.clone(),
                        text: match &check.url {
                            Some(url) => format!("{} ({})", check.text, url),
                            None => check.text.clone(),
                        },
                        state: latest
                            .map(|status| status.state.to_string())
                            .unwrap_or_else(|| "none".to_string()),
                        by: latest
                            .and_then(|status| status.creator.as_ref())
                            .map(|creator| creator.login.clone())
                            .unwrap_or_else(|| "-".to_string()),
                    }
                })
                .collect();
            output::print_output(rows, app.output)
        }
        RoutineCommands::Set { id, state } => {
            if !checks.iter().any(|check| check.id == id) {
                bail!("Unknown routine check {}; the policy defines {}", id, known(&meta));
            }
            let status = app
                .writer()
                .await?
                .set_routine_check(&sha, &id, state.into())
                .await?;
            match app.output {
                OutputFormat::Table => {
                    print_success(&format!("Routine check {} is {}", id, status.state));
                    Ok(())
                }
                format => output::print_single(&status, format),
            }
        }
    }
}

fn known(meta: &qvet_config::ConfigMeta) -> String {
    let ids: Vec<&str> = meta
        .config()
        .routine_checks
        .iter()
        .map(|check| check.id.as_str())
        .collect();
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}
