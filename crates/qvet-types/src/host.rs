//! Source-control collaborator trait
//!
//! The readiness core never talks HTTP. Everything it needs from the host is
//! expressed here, so the GitHub client, the caching layer and the in-memory
//! fake are interchangeable.

use crate::check_run::CheckRun;
use crate::commit::CommitComparison;
use crate::error::HostResult;
use crate::repo::{OwnerRepo, User};
use crate::status::{Status, StatusState};
use crate::tag::TagPage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A status to be appended to a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStatus {
    /// Commit the status is attached to
    pub sha: String,

    /// Encoded context string
    pub context: String,

    /// New state
    pub state: StatusState,

    /// Description, already validated by the caller
    pub description: String,

    /// Link attached to the entry
    pub target_url: Option<String>,
}

/// Read and write operations the core requires from the host
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Name of the repository's default branch
    async fn get_default_branch(&self, repo: &OwnerRepo) -> HostResult<String>;

    /// Sha at the tip of `branch`
    async fn get_branch_tip(&self, repo: &OwnerRepo, branch: &str) -> HostResult<String>;

    /// One page (1-based) of tags, newest registered first
    async fn list_tags(&self, repo: &OwnerRepo, page: u32, per_page: u32) -> HostResult<TagPage>;

    /// Commits reachable from `head` but not from `base`
    async fn compare_commits(
        &self,
        repo: &OwnerRepo,
        base: &str,
        head: &str,
    ) -> HostResult<CommitComparison>;

    /// Statuses attached to `sha`, newest first
    async fn list_commit_statuses(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<Status>>;

    /// Append a status; returns the created entry
    async fn create_commit_status(&self, repo: &OwnerRepo, status: &NewStatus)
        -> HostResult<Status>;

    /// Check-runs reported against `sha`
    async fn list_check_runs(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<CheckRun>>;

    /// Text of a file on the default branch; `None` when it does not exist
    async fn get_file_contents(&self, repo: &OwnerRepo, path: &str) -> HostResult<Option<String>>;

    /// Members of an organization team
    async fn list_team_members(&self, org: &str, team_slug: &str) -> HostResult<Vec<User>>;

    /// Account owning the current credentials
    async fn get_authenticated_user(&self) -> HostResult<User>;
}
