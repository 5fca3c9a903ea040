//! In-memory implementation of [`SourceControl`]
//!
//! Suitable for development and testing. It holds a single repository's
//! worth of refs, statuses and check-runs, records which operations were
//! called and can be told to fail specific operations.

use crate::check_run::CheckRun;
use crate::commit::CommitComparison;
use crate::error::{HostError, HostResult};
use crate::host::{NewStatus, SourceControl};
use crate::repo::{OwnerRepo, User};
use crate::status::Status;
use crate::tag::{Tag, TagPage};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Operations of [`SourceControl`], used for call accounting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOperation {
    DefaultBranch,
    BranchTip,
    ListTags,
    CompareCommits,
    ListCommitStatuses,
    CreateCommitStatus,
    ListCheckRuns,
    GetFileContents,
    ListTeamMembers,
    AuthenticatedUser,
}

#[derive(Debug, Default)]
struct State {
    default_branch: String,
    branches: HashMap<String, String>,
    tag_pages: Vec<Vec<Tag>>,
    tag_pages_requested: Vec<u32>,
    comparisons: HashMap<(String, String), CommitComparison>,
    statuses: HashMap<String, Vec<Status>>,
    check_runs: HashMap<String, Vec<CheckRun>>,
    files: HashMap<String, String>,
    teams: HashMap<(String, String), Vec<User>>,
    user: Option<User>,
    failures: HashMap<HostOperation, HostError>,
    calls: HashMap<HostOperation, usize>,
    next_status_id: u64,
}

/// In-memory source-control host
#[derive(Debug)]
pub struct InMemorySourceControl {
    state: RwLock<State>,
}

impl InMemorySourceControl {
    /// Create a host whose default branch is `main`
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                default_branch: "main".to_string(),
                next_status_id: 1,
                ..Default::default()
            }),
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.state.get_mut().default_branch = branch.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>, sha: impl Into<String>) -> Self {
        self.state.get_mut().branches.insert(branch.into(), sha.into());
        self
    }

    /// Replace the tag listing with the given pages
    pub fn with_tag_pages(mut self, pages: Vec<Vec<Tag>>) -> Self {
        self.state.get_mut().tag_pages = pages;
        self
    }

    pub fn with_comparison(
        mut self,
        base: impl Into<String>,
        head: impl Into<String>,
        comparison: CommitComparison,
    ) -> Self {
        self.state
            .get_mut()
            .comparisons
            .insert((base.into(), head.into()), comparison);
        self
    }

    /// Set the statuses of `sha`, newest first
    pub fn with_statuses(mut self, sha: impl Into<String>, statuses: Vec<Status>) -> Self {
        self.state.get_mut().statuses.insert(sha.into(), statuses);
        self
    }

    pub fn with_check_runs(mut self, sha: impl Into<String>, runs: Vec<CheckRun>) -> Self {
        self.state.get_mut().check_runs.insert(sha.into(), runs);
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.state.get_mut().files.insert(path.into(), contents.into());
        self
    }

    pub fn with_team(
        mut self,
        org: impl Into<String>,
        team_slug: impl Into<String>,
        members: Vec<User>,
    ) -> Self {
        self.state
            .get_mut()
            .teams
            .insert((org.into(), team_slug.into()), members);
        self
    }

    /// Set the authenticated user, also used as creator of new statuses
    pub fn with_user(mut self, user: User) -> Self {
        self.state.get_mut().user = Some(user);
        self
    }

    /// Make every call of `operation` fail with `error`
    pub fn with_failure(mut self, operation: HostOperation, error: HostError) -> Self {
        self.state.get_mut().failures.insert(operation, error);
        self
    }

    /// Make every call of `operation` fail from now on
    pub async fn fail(&self, operation: HostOperation, error: HostError) {
        self.state.write().await.failures.insert(operation, error);
    }

    /// Stop failing `operation`
    pub async fn recover(&self, operation: HostOperation) {
        self.state.write().await.failures.remove(&operation);
    }

    /// Number of calls made to `operation`
    pub async fn call_count(&self, operation: HostOperation) -> usize {
        self.state
            .read()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// Tag pages requested so far, in request order
    pub async fn tag_pages_requested(&self) -> Vec<u32> {
        self.state.read().await.tag_pages_requested.clone()
    }

    /// Current statuses of `sha`, newest first
    pub async fn statuses(&self, sha: &str) -> Vec<Status> {
        self.state
            .read()
            .await
            .statuses
            .get(sha)
            .cloned()
            .unwrap_or_default()
    }

    fn enter(state: &mut State, operation: HostOperation) -> HostResult<()> {
        *state.calls.entry(operation).or_insert(0) += 1;
        match state.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for InMemorySourceControl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceControl for InMemorySourceControl {
    async fn get_default_branch(&self, _repo: &OwnerRepo) -> HostResult<String> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::DefaultBranch)?;
        Ok(state.default_branch.clone())
    }

    async fn get_branch_tip(&self, _repo: &OwnerRepo, branch: &str) -> HostResult<String> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::BranchTip)?;
        state
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("branch {}", branch)))
    }

    async fn list_tags(&self, _repo: &OwnerRepo, page: u32, _per_page: u32) -> HostResult<TagPage> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::ListTags)?;
        state.tag_pages_requested.push(page);

        let index = page.saturating_sub(1) as usize;
        let tags = state.tag_pages.get(index).cloned().unwrap_or_default();
        Ok(TagPage {
            tags,
            has_next: index + 1 < state.tag_pages.len(),
        })
    }

    async fn compare_commits(
        &self,
        _repo: &OwnerRepo,
        base: &str,
        head: &str,
    ) -> HostResult<CommitComparison> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::CompareCommits)?;
        state
            .comparisons
            .get(&(base.to_string(), head.to_string()))
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("comparison {}...{}", base, head)))
    }

    async fn list_commit_statuses(&self, _repo: &OwnerRepo, sha: &str) -> HostResult<Vec<Status>> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::ListCommitStatuses)?;
        Ok(state.statuses.get(sha).cloned().unwrap_or_default())
    }

    async fn create_commit_status(
        &self,
        _repo: &OwnerRepo,
        status: &NewStatus,
    ) -> HostResult<Status> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::CreateCommitStatus)?;

        let id = state.next_status_id;
        state.next_status_id += 1;

        let created = Status {
            id,
            context: status.context.clone(),
            state: status.state,
            description: Some(status.description.clone()),
            creator: state.user.clone(),
            created_at: Utc::now(),
            target_url: status.target_url.clone(),
        };
        state
            .statuses
            .entry(status.sha.clone())
            .or_default()
            .insert(0, created.clone());
        Ok(created)
    }

    async fn list_check_runs(&self, _repo: &OwnerRepo, sha: &str) -> HostResult<Vec<CheckRun>> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::ListCheckRuns)?;
        Ok(state.check_runs.get(sha).cloned().unwrap_or_default())
    }

    async fn get_file_contents(&self, _repo: &OwnerRepo, path: &str) -> HostResult<Option<String>> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::GetFileContents)?;
        Ok(state.files.get(path).cloned())
    }

    async fn list_team_members(&self, org: &str, team_slug: &str) -> HostResult<Vec<User>> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::ListTeamMembers)?;
        state
            .teams
            .get(&(org.to_string(), team_slug.to_string()))
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("team {}/{}", org, team_slug)))
    }

    async fn get_authenticated_user(&self) -> HostResult<User> {
        let mut state = self.state.write().await;
        Self::enter(&mut state, HostOperation::AuthenticatedUser)?;
        state
            .user
            .clone()
            .ok_or_else(|| HostError::Unauthorized("no authenticated user".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusState;

    fn repo() -> OwnerRepo {
        OwnerRepo::new("octo", "widgets")
    }

    #[tokio::test]
    async fn test_created_status_is_listed_first() {
        let host = InMemorySourceControl::new().with_user(User::new(1, "alice"));
        let new = NewStatus {
            sha: "abc".into(),
            context: "qvet/qa".into(),
            state: StatusState::Success,
            description: "Completed by alice".into(),
            target_url: None,
        };

        host.create_commit_status(&repo(), &new).await.unwrap();
        host.create_commit_status(
            &repo(),
            &NewStatus {
                state: StatusState::Failure,
                ..new.clone()
            },
        )
        .await
        .unwrap();

        let listed = host.list_commit_statuses(&repo(), "abc").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].state, StatusState::Failure);
        assert_eq!(listed[0].creator.as_ref().unwrap().login, "alice");
    }

    #[tokio::test]
    async fn test_failure_injection_and_call_counts() {
        let host = InMemorySourceControl::new()
            .with_failure(HostOperation::ListCheckRuns, HostError::Transport("down".into()));

        assert!(host.list_check_runs(&repo(), "abc").await.is_err());
        assert_eq!(host.call_count(HostOperation::ListCheckRuns).await, 1);

        host.recover(HostOperation::ListCheckRuns).await;
        assert!(host.list_check_runs(&repo(), "abc").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_pages() {
        let host = InMemorySourceControl::new().with_tag_pages(vec![
            vec![Tag::new("v2", "s2")],
            vec![Tag::new("v1", "s1")],
        ]);

        let first = host.list_tags(&repo(), 1, 100).await.unwrap();
        assert!(first.has_next);
        let second = host.list_tags(&repo(), 2, 100).await.unwrap();
        assert!(!second.has_next);
        assert_eq!(host.tag_pages_requested().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let host = InMemorySourceControl::new().with_file("qvet.yml", "team: null");
        assert!(host.get_file_contents(&repo(), "qvet.yml").await.unwrap().is_some());
        assert!(host.get_file_contents(&repo(), "other.yml").await.unwrap().is_none());
    }
}
