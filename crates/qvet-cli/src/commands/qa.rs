//! QA decisions on undeployed commits

use crate::app::App;
use crate::output::{self, print_success, OutputFormat};
use anyhow::Result;
use qvet_status::{StatusContext, StatusUpdate, WriteableState};

/// QA decision for a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QaDecision {
    /// Mark the commit as tested
    Approve,
    /// Mark the commit as failing QA
    Reject,
    /// Withdraw the decision
    Clear,
}

impl From<QaDecision> for WriteableState {
    fn from(decision: QaDecision) -> Self {
        match decision {
            QaDecision::Approve => WriteableState::Success,
            QaDecision::Reject => WriteableState::Failure,
            QaDecision::Clear => WriteableState::Pending,
        }
    }
}

/// Record a QA decision; `sha` may be abbreviated
pub async fn execute(
    app: &App,
    sha: &str,
    decision: QaDecision,
    description: Option<String>,
) -> Result<()> {
    let meta = app.config_meta().await?;
    let sha = app.resolve_commit(&meta, sha).await?;
    let writer = app.writer().await?;

    let status = match description {
        Some(description) => {
            writer
                .write(
                    StatusUpdate::new(&sha, StatusContext::Qa, decision.into())
                        .with_description(description),
                )
                .await?
        }
        None => writer.set_qa(&sha, decision.into()).await?,
    };

    match app.output {
        OutputFormat::Table => print_success(&format!(
            "QA of {} is {}: {}",
            output::short_sha(&sha),
            status.state,
            status.description.as_deref().unwrap_or_default()
        )),
        format => output::print_single(&status, format)?,
    }
    Ok(())
}
