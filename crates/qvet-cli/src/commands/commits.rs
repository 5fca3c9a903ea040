//! Undeployed commits and their QA state

use crate::app::App;
use crate::output::{self, print_info};
use anyhow::Result;
use qvet_readiness::Snapshot;
use qvet_types::{Commit, Load};
use serde::Serialize;
use tabled::Tabled;

/// Table row for commit display
#[derive(Debug, Serialize, Tabled)]
struct CommitRow {
    sha: String,
    author: String,
    qa: String,
    summary: String,
}

/// List undeployed commits; `all` includes ignored ones
pub async fn execute(app: &App, all: bool) -> Result<()> {
    let snapshot = app.snapshot().await?;

    if let Load::Failed(message) = &snapshot.range {
        anyhow::bail!("Cannot read undeployed commits: {}", message);
    }

    let mut rows: Vec<CommitRow> = snapshot
        .selection
        .developer_commits
        .iter()
        .map(|commit| row(commit, qa_text(&snapshot, &commit.sha)))
        .collect();
    if all {
        rows.extend(
            snapshot
                .selection
                .ignored_commits
                .iter()
                .map(|commit| row(commit, "ignored".to_string())),
        );
    }

    let is_table = matches!(app.output, output::OutputFormat::Table);
    output::print_output(rows, app.output)?;

    if is_table && !all && snapshot.selection.ignored_count() > 0 {
        let rules = snapshot
            .selection
            .ignored_description
            .as_deref()
            .unwrap_or_default();
        print_info(&format!(
            "{} commits hidden by ignore rules ({}); use --all to show them",
            snapshot.selection.ignored_count(),
            rules
        ));
    }
    Ok(())
}

fn row(commit: &Commit, qa: String) -> CommitRow {
    CommitRow {
        sha: commit.short_sha().to_string(),
        author: commit.author_login().unwrap_or("-").to_string(),
        qa,
        summary: commit.summary().to_string(),
    }
}

fn qa_text(snapshot: &Snapshot, sha: &str) -> String {
    match snapshot.qa_status(sha) {
        Load::Loading => "loading".to_string(),
        Load::Failed(_) => "unavailable".to_string(),
        Load::Ready(None) => "none".to_string(),
        Load::Ready(Some(status)) => match &status.creator {
            Some(creator) => format!("{} ({})", status.state, creator.login),
            None => status.state.to_string(),
        },
    }
}
