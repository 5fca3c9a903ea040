//! Repository policy inspection

use crate::app::App;
use crate::output::{self, print_error, print_info, print_success, OutputFormat};
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use qvet_config::{Config, ConfigMeta, ConfigStatus, ValidationError, CONFIG_FILE_PATH};
use serde::Serialize;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the policy in effect, with defaults filled in
    Show,

    /// Validate a policy document
    Check {
        /// Local file to validate instead of the repository's
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    status: ConfigStatus,
    valid: bool,
    errors: &'a [ValidationError],
    config: &'a Config,
}

impl<'a> From<&'a ConfigMeta> for ConfigView<'a> {
    fn from(meta: &'a ConfigMeta) -> Self {
        Self {
            status: meta.status(),
            valid: meta.parse_result.is_valid(),
            errors: &meta.parse_result.errors,
            config: meta.config(),
        }
    }
}

pub async fn execute(command: ConfigCommands, settings: &Settings, format: OutputFormat) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let app = App::new(settings, format)?;
            let meta = app.config_meta().await?;
            match format {
                OutputFormat::Table => {
                    print_info(&format!("{} in {}: {}", CONFIG_FILE_PATH, app.repo(), meta.status()));
                    if let Some(errors) = &meta.parse_result.errors_text {
                        print_error(errors);
                    }
                    print!("{}", serde_yaml::to_string(meta.config())?);
                    Ok(())
                }
                format => output::print_single(&ConfigView::from(&meta), format),
            }
        }
        ConfigCommands::Check { file } => {
            let meta = match file {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Cannot read {}", path))?;
                    ConfigMeta::from_file(Some(&raw))
                }
                None => App::new(settings, format)?.config_meta().await?,
            };
            check(&meta, format)
        }
    }
}

fn check(meta: &ConfigMeta, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => match meta.status() {
            ConfigStatus::Missing => print_info(&format!(
                "No {} found; the default policy applies",
                CONFIG_FILE_PATH
            )),
            ConfigStatus::Custom => print_success("Policy is valid"),
            ConfigStatus::Invalid => {
                for error in &meta.parse_result.errors {
                    print_error(&error.to_string());
                }
            }
        },
        format => output::print_single(&ConfigView::from(meta), format)?,
    }

    if meta.status() == ConfigStatus::Invalid {
        bail!(
            "Policy is invalid ({} errors); the default policy applies",
            meta.parse_result.errors.len()
        );
    }
    Ok(())
}
