//! Collecting everything evaluation needs from the host
//!
//! Independent reads run concurrently. Failures are captured per source as
//! [`Load::Failed`] so that one unavailable endpoint degrades the report
//! instead of aborting it.

use crate::engine::ReadinessInputs;
use crate::selection::CommitSelection;
use futures::future::join_all;
use qvet_config::{Config, ConfigMeta};
use qvet_release::{base_branch, resolve_prod_tag, ReleaseError, ReleaseRange};
use qvet_status::{StatusContext, StatusList};
use qvet_types::{CheckRun, Load, OwnerRepo, SourceControl, Status, User};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Point-in-time view of a repository
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub repo: OwnerRepo,
    pub config_meta: ConfigMeta,

    /// The user the report is prepared for
    pub actor: Option<User>,

    pub range: Load<ReleaseRange>,

    /// Developer and ignored commits of the range; empty when the range failed
    pub selection: CommitSelection,

    /// Status lists of developer commits keyed by sha
    pub qa_statuses: HashMap<String, Load<StatusList>>,

    /// Statuses of the base tip
    pub base_statuses: Load<StatusList>,

    /// Check-runs of the base tip; empty when check-runs are disabled
    pub check_runs: Load<Vec<CheckRun>>,

    /// Team roster; `None` when no team is configured
    pub team_members: Option<Load<Vec<User>>>,
}

impl Snapshot {
    pub fn config(&self) -> &Config {
        self.config_meta.config()
    }

    pub fn base_sha(&self) -> Option<&str> {
        self.range.ready().map(|range| range.base_sha.as_str())
    }

    /// Latest QA status of a commit
    pub fn qa_status(&self, sha: &str) -> Load<Option<&Status>> {
        match self.qa_statuses.get(sha) {
            None | Some(Load::Loading) => Load::Loading,
            Some(Load::Failed(message)) => Load::Failed(message.clone()),
            Some(Load::Ready(statuses)) => Load::Ready(statuses.latest(&StatusContext::Qa)),
        }
    }

    /// Borrow the snapshot as evaluation inputs
    pub fn inputs(&self) -> ReadinessInputs<'_> {
        ReadinessInputs {
            config: self.config(),
            base_sha: self.base_sha().unwrap_or_default(),
            developer_commits: &self.selection.developer_commits,
            qa_statuses: &self.qa_statuses,
            base_statuses: &self.base_statuses,
            check_runs: &self.check_runs,
            team_members: self.team_members.as_ref(),
            actor: self.actor.as_ref(),
        }
    }
}

/// Read every source needed to evaluate `repo` under the policy in `config_meta`
#[instrument(skip(host, repo, actor, config_meta), fields(repo = %repo))]
pub async fn collect_snapshot(
    host: &dyn SourceControl,
    repo: &OwnerRepo,
    actor: Option<User>,
    config_meta: ConfigMeta,
) -> Snapshot {
    let config = config_meta.config().clone();

    let team = async {
        match &config.team {
            Some(team) => Some(Load::from_result(
                host.list_team_members(&team.org, &team.team_slug).await,
            )),
            None => None,
        }
    };
    let (base, prod_tag, team_members) = futures::join!(
        resolve_base_tip(host, repo, &config),
        resolve_prod_tag(host, repo, &config),
        team
    );

    let (range, base_statuses, check_runs) = match (base, prod_tag) {
        (Ok((base_branch, base_sha)), Ok(prod_tag)) => {
            let comparison = async {
                match &prod_tag {
                    Some(tag) => host
                        .compare_commits(repo, tag.sha(), &base_sha)
                        .await
                        .map(Some),
                    None => Ok(None),
                }
            };
            let (comparison, base_statuses, check_runs) = futures::join!(
                comparison,
                host.list_commit_statuses(repo, &base_sha),
                list_check_runs(host, repo, &base_sha, &config)
            );
            let range = comparison.map(|comparison| ReleaseRange {
                base_branch,
                base_sha: base_sha.clone(),
                prod_tag,
                comparison,
            });
            (
                Load::from_result(range),
                Load::from_result(base_statuses.map(StatusList::new)),
                check_runs,
            )
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to resolve release range");
            let message = e.to_string();
            (
                Load::Failed(message.clone()),
                Load::Failed(message.clone()),
                Load::Failed(message),
            )
        }
    };

    let selection = match &range {
        Load::Ready(ReleaseRange {
            comparison: Some(comparison),
            ..
        }) => CommitSelection::select(&comparison.commits, &config.commit.ignore),
        _ => CommitSelection::default(),
    };

    let qa_statuses: HashMap<_, _> = join_all(selection.developer_commits.iter().map(|commit| async move {
        let statuses = host.list_commit_statuses(repo, &commit.sha).await;
        (commit.sha.clone(), Load::from_result(statuses.map(StatusList::new)))
    }))
    .await
    .into_iter()
    .collect();

    debug!(
        developer_commits = selection.developer_commits.len(),
        ignored_commits = selection.ignored_count(),
        "Collected snapshot"
    );

    Snapshot {
        repo: repo.clone(),
        config_meta,
        actor,
        range,
        selection,
        qa_statuses,
        base_statuses,
        check_runs,
        team_members,
    }
}

async fn resolve_base_tip(
    host: &dyn SourceControl,
    repo: &OwnerRepo,
    config: &Config,
) -> Result<(String, String), ReleaseError> {
    let branch = base_branch(host, repo, config).await?;
    let sha = host.get_branch_tip(repo, &branch).await?;
    Ok((branch, sha))
}

async fn list_check_runs(
    host: &dyn SourceControl,
    repo: &OwnerRepo,
    sha: &str,
    config: &Config,
) -> Load<Vec<CheckRun>> {
    if !config.check_runs.enabled {
        return Load::Ready(Vec::new());
    }
    let result = host.list_check_runs(repo, sha).await;
    if let Err(e) = &result {
        warn!(error = %e, "Failed to list check-runs, not blocking on them");
    }
    Load::from_result(result)
}
