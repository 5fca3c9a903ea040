//! Where the active policy came from

use crate::error::Result;
use crate::model::Config;
use crate::parse::{parse_config_file, ParseConfigFileResult};
use qvet_types::{OwnerRepo, SourceControl};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Path of the policy document on the default branch
pub const CONFIG_FILE_PATH: &str = "qvet.yml";

/// Parsed policy together with how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMeta {
    pub parse_result: ParseConfigFileResult,

    /// The repository has no policy document
    pub repository_file_missing: bool,
}

/// Summary of [`ConfigMeta`] for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigStatus {
    Missing,
    Invalid,
    Custom,
}

impl ConfigStatus {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Missing => "Config file not found",
            Self::Invalid => "Invalid config file",
            Self::Custom => "Using custom settings from config file",
        }
    }
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl ConfigMeta {
    /// Build from raw document text; `None` means the file does not exist
    pub fn from_file(raw: Option<&str>) -> Self {
        Self {
            parse_result: parse_config_file(raw),
            repository_file_missing: raw.is_none(),
        }
    }

    /// Fetch and parse the repository's policy document
    ///
    /// A missing document is the default policy. Any other host failure is
    /// returned so that the caller can show the policy as unavailable.
    pub async fn load(host: &dyn SourceControl, repo: &OwnerRepo) -> Result<Self> {
        let raw = match host.get_file_contents(repo, CONFIG_FILE_PATH).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        let meta = Self::from_file(raw.as_deref());
        match meta.status() {
            ConfigStatus::Missing => debug!(repo = %repo, "No {} in repository", CONFIG_FILE_PATH),
            ConfigStatus::Invalid => warn!(
                repo = %repo,
                errors = meta.parse_result.errors_text.as_deref().unwrap_or_default(),
                "Invalid {}, using defaults",
                CONFIG_FILE_PATH
            ),
            ConfigStatus::Custom => debug!(repo = %repo, "Loaded {}", CONFIG_FILE_PATH),
        }
        Ok(meta)
    }

    pub fn config(&self) -> &Config {
        &self.parse_result.config
    }

    pub fn status(&self) -> ConfigStatus {
        if self.repository_file_missing {
            ConfigStatus::Missing
        } else if self.parse_result.errors_text.is_some() {
            ConfigStatus::Invalid
        } else {
            ConfigStatus::Custom
        }
    }
}
