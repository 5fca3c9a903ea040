//! Status write path
//!
//! Writes go straight to the host: nothing is read first, nothing is
//! retried, and failures are returned to the caller.

use crate::context::StatusContext;
use crate::describe::{describe_update, WriteableState};
use crate::error::Result;
use qvet_types::{NewStatus, OwnerRepo, SourceControl, Status};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Random lowercase hex id for a new embargo or deployment note
pub fn random_hex_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:x}", rng.gen_range(0..0xffff_ffffu32))
}

/// A status to append to a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub sha: String,
    pub context: StatusContext,
    pub state: WriteableState,

    /// Explicit description; synthesized from state and actor when absent
    pub description: Option<String>,

    pub target_url: Option<String>,
}

impl StatusUpdate {
    pub fn new(sha: impl Into<String>, context: StatusContext, state: WriteableState) -> Self {
        Self {
            sha: sha.into(),
            context,
            state,
            description: None,
            target_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Writes qvet statuses on behalf of one user
pub struct StatusWriter<'a> {
    host: &'a dyn SourceControl,
    repo: OwnerRepo,
    actor: String,
    target_url: Option<String>,
}

impl<'a> StatusWriter<'a> {
    pub fn new(host: &'a dyn SourceControl, repo: OwnerRepo, actor: impl Into<String>) -> Self {
        Self {
            host,
            repo,
            actor: actor.into(),
            target_url: None,
        }
    }

    /// Link attached to every status that does not carry its own
    pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Append `update` to its commit
    #[instrument(skip(self, update), fields(repo = %self.repo, sha = %update.sha, context = %update.context))]
    pub async fn write(&self, update: StatusUpdate) -> Result<Status> {
        let description = describe_update(update.state, &self.actor, update.description.as_deref())?;
        let new = NewStatus {
            sha: update.sha,
            context: update.context.to_string(),
            state: update.state.into(),
            description,
            target_url: update.target_url.or_else(|| self.target_url.clone()),
        };

        let created = self.host.create_commit_status(&self.repo, &new).await?;
        info!(state = %new.state, actor = %self.actor, "Status written");
        Ok(created)
    }

    /// Record the manual QA decision on a developer commit
    pub async fn set_qa(&self, sha: &str, state: WriteableState) -> Result<Status> {
        self.write(StatusUpdate::new(sha, StatusContext::Qa, state)).await
    }

    /// Place an embargo on the base commit
    pub async fn add_embargo(&self, sha: &str, id: &str, reason: &str) -> Result<Status> {
        self.write(
            StatusUpdate::new(sha, StatusContext::embargo(id), WriteableState::Failure)
                .with_description(reason),
        )
        .await
    }

    pub async fn resolve_embargo(&self, sha: &str, id: &str) -> Result<Status> {
        self.write(StatusUpdate::new(
            sha,
            StatusContext::embargo(id),
            WriteableState::Success,
        ))
        .await
    }

    /// Attach a deployment note to the base commit
    pub async fn add_deployment_note(&self, sha: &str, id: &str, message: &str) -> Result<Status> {
        self.write(
            StatusUpdate::new(
                sha,
                StatusContext::deployment_note(id),
                WriteableState::Failure,
            )
            .with_description(message),
        )
        .await
    }

    pub async fn resolve_deployment_note(&self, sha: &str, id: &str) -> Result<Status> {
        self.write(StatusUpdate::new(
            sha,
            StatusContext::deployment_note(id),
            WriteableState::Success,
        ))
        .await
    }

    /// Tick, fail or reset a configured routine check on the base commit
    pub async fn set_routine_check(
        &self,
        sha: &str,
        id: &str,
        state: WriteableState,
    ) -> Result<Status> {
        let description = match state {
            WriteableState::Success => "Routine check approved",
            WriteableState::Failure => "Routine check failed",
            WriteableState::Pending => "Routine check reset",
        };
        self.write(
            StatusUpdate::new(sha, StatusContext::routine_check(id), state)
                .with_description(description),
        )
        .await
    }

    /// Lift the embargo of an unresolved embargo-level check-run
    pub async fn overrule_check_run(&self, sha: &str, name: &str) -> Result<Status> {
        let description = format!("Overruled by {}", self.actor);
        self.write(
            StatusUpdate::new(
                sha,
                StatusContext::check_run_overrule(name),
                WriteableState::Success,
            )
            .with_description(description),
        )
        .await
    }

    pub async fn remove_check_run_overrule(&self, sha: &str, name: &str) -> Result<Status> {
        let description = format!("Overrule removed by {}", self.actor);
        self.write(
            StatusUpdate::new(
                sha,
                StatusContext::check_run_overrule(name),
                WriteableState::Failure,
            )
            .with_description(description),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::active::{decode_active_by_kind, ActiveKind};
    use crate::error::StatusError;
    use crate::list::StatusList;
    use qvet_types::{HostError, HostOperation, InMemorySourceControl, StatusState, User};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn repo() -> OwnerRepo {
        OwnerRepo::new("octo", "widgets")
    }

    fn host() -> InMemorySourceControl {
        InMemorySourceControl::new().with_user(User::new(7, "alice"))
    }

    #[test]
    fn test_random_hex_id() {
        let mut rng = StdRng::seed_from_u64(42);
        let id = random_hex_id(&mut rng);
        assert!(!id.is_empty() && id.len() <= 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, random_hex_id(&mut rng));
    }

    #[tokio::test]
    async fn test_set_qa_synthesizes_description() {
        let host = host();
        let writer = StatusWriter::new(&host, repo(), "alice")
            .with_target_url("https://qvet.example.com");

        let status = writer.set_qa("abc", WriteableState::Success).await.unwrap();
        assert_eq!(status.context, "qvet/qa");
        assert_eq!(status.state, StatusState::Success);
        assert_eq!(status.description.as_deref(), Some("Completed by alice"));
        assert_eq!(status.target_url.as_deref(), Some("https://qvet.example.com"));
    }

    #[tokio::test]
    async fn test_embargo_lifecycle() {
        let host = host();
        let writer = StatusWriter::new(&host, repo(), "alice");

        writer.add_embargo("base", "1a2b", "DB migration running").await.unwrap();
        let list = StatusList::new(host.statuses("base").await);
        let active = decode_active_by_kind("base", &list, ActiveKind::Embargo);
        assert_eq!(active.len(), 1);
        assert_eq!(
            active[0].status.description.as_deref(),
            Some("DB migration running")
        );

        writer.resolve_embargo("base", "1a2b").await.unwrap();
        let list = StatusList::new(host.statuses("base").await);
        assert!(decode_active_by_kind("base", &list, ActiveKind::Embargo).is_empty());
    }

    #[tokio::test]
    async fn test_overrule_toggles() {
        let host = host();
        let writer = StatusWriter::new(&host, repo(), "alice");
        let context = StatusContext::check_run_overrule("e2e");

        writer.overrule_check_run("base", "e2e").await.unwrap();
        let list = StatusList::new(host.statuses("base").await);
        assert!(list.latest(&context).unwrap().is_success());

        writer.remove_check_run_overrule("base", "e2e").await.unwrap();
        let list = StatusList::new(host.statuses("base").await);
        let latest = list.latest(&context).unwrap();
        assert_eq!(latest.state, StatusState::Failure);
        assert_eq!(latest.description.as_deref(), Some("Overrule removed by alice"));
    }

    #[tokio::test]
    async fn test_routine_check_descriptions() {
        let host = host();
        let writer = StatusWriter::new(&host, repo(), "alice");
        let status = writer
            .set_routine_check("base", "smoke", WriteableState::Pending)
            .await
            .unwrap();
        assert_eq!(status.context, "qvet/routine-check/smoke");
        assert_eq!(status.description.as_deref(), Some("Routine check reset"));
    }

    #[tokio::test]
    async fn test_long_note_is_refused_without_writing() {
        let host = host();
        let writer = StatusWriter::new(&host, repo(), "alice");
        let result = writer
            .add_deployment_note("base", "n1", &"x".repeat(200))
            .await;
        assert!(matches!(result, Err(StatusError::DescriptionTooLong { .. })));
        assert_eq!(host.call_count(HostOperation::CreateCommitStatus).await, 0);
    }

    #[tokio::test]
    async fn test_host_failure_is_returned_once() {
        let host = host().with_failure(
            HostOperation::CreateCommitStatus,
            HostError::Unauthorized("token expired".into()),
        );
        let writer = StatusWriter::new(&host, repo(), "alice");
        let result = writer.set_qa("abc", WriteableState::Failure).await;
        assert!(matches!(result, Err(StatusError::Host(HostError::Unauthorized(_)))));
        assert_eq!(host.call_count(HostOperation::CreateCommitStatus).await, 1);
    }
}
