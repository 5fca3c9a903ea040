//! Check-run overrules on the base commit

use crate::app::App;
use crate::output::{self, print_success, print_warning, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use qvet_checks::classify_level;
use qvet_config::CheckRunLevel;

/// Overrule subcommands
#[derive(Subcommand)]
pub enum OverruleCommands {
    /// Let deployment proceed despite an unresolved check-run
    Add {
        /// Check-run name
        name: String,
    },

    /// Withdraw an overrule
    Remove {
        /// Check-run name
        name: String,
    },
}

pub async fn execute(command: OverruleCommands, app: &App) -> Result<()> {
    let meta = app.config_meta().await?;
    let sha = app.base_sha(&meta).await?;
    let writer = app.writer().await?;

    let (status, message) = match command {
        OverruleCommands::Add { name } => {
            if classify_level(&name, &meta.config().check_runs) != CheckRunLevel::Embargo {
                print_warning(&format!(
                    "{} is not an embargo-level check-run; the overrule has no effect",
                    name
                ));
            }
            let status = writer.overrule_check_run(&sha, &name).await?;
            (status, format!("{} overruled", name))
        }
        OverruleCommands::Remove { name } => {
            let status = writer.remove_check_run_overrule(&sha, &name).await?;
            (status, format!("Overrule of {} removed", name))
        }
    };

    match app.output {
        OutputFormat::Table => {
            print_success(&message);
            Ok(())
        }
        format => output::print_single(&status, format),
    }
}
