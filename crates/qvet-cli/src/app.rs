//! Shared command context

use crate::output::OutputFormat;
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use qvet_config::ConfigMeta;
use qvet_github::{CachedSource, GitHubClient};
use qvet_readiness::{collect_snapshot, Snapshot};
use qvet_release::{resolve_base, resolve_range};
use qvet_status::{StatusList, StatusWriter};
use qvet_types::{OwnerRepo, SourceControl, User};
use tracing::{debug, warn};

/// Connection to one repository, built from settings
pub struct App {
    host: CachedSource<GitHubClient>,
    repo: OwnerRepo,
    target_url: Option<String>,
    pub output: OutputFormat,
}

impl App {
    pub fn new(settings: &Settings, output: OutputFormat) -> Result<Self> {
        let repo = settings
            .repo
            .as_deref()
            .context("No repository given; pass --repo owner/repo or set QVET_REPO")?
            .parse::<OwnerRepo>()?;
        let token = settings
            .token
            .as_deref()
            .context("No GitHub token given; pass --token or set QVET_TOKEN")?;

        let client = GitHubClient::new(&settings.api_url, token)
            .with_context(|| format!("Cannot use API URL {}", settings.api_url))?;
        debug!(api_url = %client.api_url(), repo = %repo, "Connecting");

        Ok(Self {
            host: CachedSource::new(client),
            repo,
            target_url: settings.target_url.clone(),
            output,
        })
    }

    pub fn host(&self) -> &dyn SourceControl {
        &self.host
    }

    pub fn repo(&self) -> &OwnerRepo {
        &self.repo
    }

    pub async fn actor(&self) -> Result<User> {
        self.host
            .get_authenticated_user()
            .await
            .context("Cannot identify the authenticated user")
    }

    pub async fn config_meta(&self) -> Result<ConfigMeta> {
        ConfigMeta::load(self.host(), &self.repo)
            .await
            .context("Cannot load the repository policy")
    }

    /// Everything `status` and `commits` show
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let config_meta = self.config_meta().await?;
        let actor = match self.actor().await {
            Ok(actor) => Some(actor),
            Err(e) => {
                warn!(error = %e, "Continuing without an authenticated user");
                None
            }
        };
        Ok(collect_snapshot(self.host(), &self.repo, actor, config_meta).await)
    }

    /// Tip of the tracked branch, where embargoes and notes are recorded
    pub async fn base_sha(&self, meta: &ConfigMeta) -> Result<String> {
        resolve_base(self.host(), &self.repo, meta.config())
            .await
            .context("Cannot resolve the base branch")
    }

    pub async fn statuses(&self, sha: &str) -> Result<StatusList> {
        let statuses = self
            .host
            .list_commit_statuses(&self.repo, sha)
            .await
            .with_context(|| format!("Cannot read statuses of {}", sha))?;
        Ok(StatusList::new(statuses))
    }

    /// Writer acting as the authenticated user
    pub async fn writer(&self) -> Result<StatusWriter<'_>> {
        let actor = self.actor().await?;
        let writer = StatusWriter::new(self.host(), self.repo.clone(), actor.login);
        Ok(match &self.target_url {
            Some(url) => writer.with_target_url(url.clone()),
            None => writer,
        })
    }

    /// Expand an abbreviated sha against the undeployed commits
    ///
    /// Anything that does not uniquely match is passed through unchanged.
    pub async fn resolve_commit(&self, meta: &ConfigMeta, sha: &str) -> Result<String> {
        let range = match resolve_range(self.host(), &self.repo, meta.config()).await {
            Ok(range) => range,
            Err(e) => {
                warn!(error = %e, "Cannot read undeployed commits, using sha as given");
                return Ok(sha.to_string());
            }
        };

        let matches: Vec<&str> = range
            .comparison
            .iter()
            .flat_map(|comparison| comparison.commits.iter())
            .map(|commit| commit.sha.as_str())
            .filter(|candidate| candidate.starts_with(sha))
            .collect();

        match matches.as_slice() {
            [single] => Ok(single.to_string()),
            [] => Ok(sha.to_string()),
            _ => bail!("{} matches {} undeployed commits", sha, matches.len()),
        }
    }
}
