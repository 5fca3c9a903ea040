//! Caching layer for any [`SourceControl`]
//!
//! Each kind of read is cached per request parameters with its own freshness
//! window. A `None` window keeps entries until they are explicitly refreshed,
//! which suits content-addressed reads such as comparisons between two shas.
//!
//! Failed reads are never cached. A successful status write is prepended to
//! the cached list of its commit so a session sees its own writes.

use async_trait::async_trait;
use qvet_types::{
    CheckRun, CommitComparison, HostResult, NewStatus, OwnerRepo, SourceControl, Status, TagPage,
    User,
};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Independently refreshable kinds of cached reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Default branch names and branch tips, along with the tag pages
    /// that move with them
    Refs,
    Tags,
    Comparisons,
    Statuses,
    CheckRuns,
    /// The policy file
    ConfigFile,
    Team,
    /// The authenticated account
    User,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::Refs,
        Source::Tags,
        Source::Comparisons,
        Source::Statuses,
        Source::CheckRuns,
        Source::ConfigFile,
        Source::Team,
        Source::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refs => "refs",
            Self::Tags => "tags",
            Self::Comparisons => "comparisons",
            Self::Statuses => "statuses",
            Self::CheckRuns => "check-runs",
            Self::ConfigFile => "config-file",
            Self::Team => "team",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness window per source; `None` means until refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub refs: Option<Duration>,
    pub tags: Option<Duration>,
    pub comparisons: Option<Duration>,
    pub statuses: Option<Duration>,
    pub check_runs: Option<Duration>,
    pub config_file: Option<Duration>,
    pub team: Option<Duration>,
    pub user: Option<Duration>,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            refs: Some(Duration::from_secs(5 * 60)),
            tags: Some(Duration::from_secs(5 * 60)),
            comparisons: None,
            statuses: Some(Duration::from_secs(5 * 60)),
            check_runs: Some(Duration::from_secs(60)),
            config_file: Some(Duration::from_secs(5 * 60)),
            team: Some(Duration::from_secs(30 * 60)),
            user: None,
        }
    }
}

impl CacheTtl {
    /// Windows that expire every entry immediately
    pub fn disabled() -> Self {
        let zero = Some(Duration::ZERO);
        Self {
            refs: zero,
            tags: zero,
            comparisons: zero,
            statuses: zero,
            check_runs: zero,
            config_file: zero,
            team: zero,
            user: zero,
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }
}

fn fresh<T: Clone>(entry: Option<&Entry<T>>, ttl: Option<Duration>) -> Option<T> {
    let entry = entry?;
    match ttl {
        Some(ttl) if entry.stored_at.elapsed() >= ttl => None,
        _ => Some(entry.value.clone()),
    }
}

type ShaKey = (OwnerRepo, String);

#[derive(Debug, Default)]
struct Caches {
    default_branches: HashMap<OwnerRepo, Entry<String>>,
    branch_tips: HashMap<ShaKey, Entry<String>>,
    tags: HashMap<(OwnerRepo, u32, u32), Entry<TagPage>>,
    comparisons: HashMap<(OwnerRepo, String, String), Entry<CommitComparison>>,
    statuses: HashMap<ShaKey, Entry<Vec<Status>>>,
    check_runs: HashMap<ShaKey, Entry<Vec<CheckRun>>>,
    files: HashMap<ShaKey, Entry<Option<String>>>,
    teams: HashMap<(String, String), Entry<Vec<User>>>,
    user: Option<Entry<User>>,
}

impl Caches {
    fn clear(&mut self, source: Source) {
        match source {
            Source::Refs => {
                self.default_branches.clear();
                self.branch_tips.clear();
                self.tags.clear();
            }
            Source::Tags => self.tags.clear(),
            Source::Comparisons => self.comparisons.clear(),
            Source::Statuses => self.statuses.clear(),
            Source::CheckRuns => self.check_runs.clear(),
            Source::ConfigFile => self.files.clear(),
            Source::Team => self.teams.clear(),
            Source::User => self.user = None,
        }
    }
}

/// A [`SourceControl`] answering repeated reads from memory
pub struct CachedSource<S> {
    inner: S,
    ttl: CacheTtl,
    caches: Mutex<Caches>,
}

impl<S: SourceControl> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, CacheTtl::default())
    }

    pub fn with_ttl(inner: S, ttl: CacheTtl) -> Self {
        Self {
            inner,
            ttl,
            caches: Mutex::new(Caches::default()),
        }
    }

    /// The wrapped host
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn ttl(&self) -> &CacheTtl {
        &self.ttl
    }

    /// Drop every cached entry of `source`
    pub async fn refresh(&self, source: Source) {
        debug!(%source, "Refreshing cache");
        self.caches.lock().await.clear(source);
    }

    pub async fn refresh_all(&self) {
        let mut caches = self.caches.lock().await;
        for source in Source::ALL {
            caches.clear(source);
        }
    }
}

#[async_trait]
impl<S: SourceControl> SourceControl for CachedSource<S> {
    async fn get_default_branch(&self, repo: &OwnerRepo) -> HostResult<String> {
        let cached = fresh(
            self.caches.lock().await.default_branches.get(repo),
            self.ttl.refs,
        );
        if let Some(branch) = cached {
            return Ok(branch);
        }

        let branch = self.inner.get_default_branch(repo).await?;
        self.caches
            .lock()
            .await
            .default_branches
            .insert(repo.clone(), Entry::new(branch.clone()));
        Ok(branch)
    }

    async fn get_branch_tip(&self, repo: &OwnerRepo, branch: &str) -> HostResult<String> {
        let key = (repo.clone(), branch.to_string());
        let cached = fresh(self.caches.lock().await.branch_tips.get(&key), self.ttl.refs);
        if let Some(sha) = cached {
            return Ok(sha);
        }

        let sha = self.inner.get_branch_tip(repo, branch).await?;
        self.caches
            .lock()
            .await
            .branch_tips
            .insert(key, Entry::new(sha.clone()));
        Ok(sha)
    }

    async fn list_tags(&self, repo: &OwnerRepo, page: u32, per_page: u32) -> HostResult<TagPage> {
        let key = (repo.clone(), page, per_page);
        let cached = fresh(self.caches.lock().await.tags.get(&key), self.ttl.tags);
        if let Some(tags) = cached {
            return Ok(tags);
        }

        let tags = self.inner.list_tags(repo, page, per_page).await?;
        self.caches
            .lock()
            .await
            .tags
            .insert(key, Entry::new(tags.clone()));
        Ok(tags)
    }

    async fn compare_commits(
        &self,
        repo: &OwnerRepo,
        base: &str,
        head: &str,
    ) -> HostResult<CommitComparison> {
        let key = (repo.clone(), base.to_string(), head.to_string());
        let cached = fresh(
            self.caches.lock().await.comparisons.get(&key),
            self.ttl.comparisons,
        );
        if let Some(comparison) = cached {
            return Ok(comparison);
        }

        let comparison = self.inner.compare_commits(repo, base, head).await?;
        self.caches
            .lock()
            .await
            .comparisons
            .insert(key, Entry::new(comparison.clone()));
        Ok(comparison)
    }

    async fn list_commit_statuses(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<Status>> {
        let key = (repo.clone(), sha.to_string());
        let cached = fresh(
            self.caches.lock().await.statuses.get(&key),
            self.ttl.statuses,
        );
        if let Some(statuses) = cached {
            return Ok(statuses);
        }

        let statuses = self.inner.list_commit_statuses(repo, sha).await?;
        self.caches
            .lock()
            .await
            .statuses
            .insert(key, Entry::new(statuses.clone()));
        Ok(statuses)
    }

    #[instrument(skip(self, repo, status), fields(repo = %repo, sha = %status.sha))]
    async fn create_commit_status(
        &self,
        repo: &OwnerRepo,
        status: &NewStatus,
    ) -> HostResult<Status> {
        let created = self.inner.create_commit_status(repo, status).await?;

        let key = (repo.clone(), status.sha.clone());
        if let Some(entry) = self.caches.lock().await.statuses.get_mut(&key) {
            entry.value.insert(0, created.clone());
            debug!(context = %created.context, "Cached status list updated");
        }
        Ok(created)
    }

    async fn list_check_runs(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<CheckRun>> {
        let key = (repo.clone(), sha.to_string());
        let cached = fresh(
            self.caches.lock().await.check_runs.get(&key),
            self.ttl.check_runs,
        );
        if let Some(runs) = cached {
            return Ok(runs);
        }

        let runs = self.inner.list_check_runs(repo, sha).await?;
        self.caches
            .lock()
            .await
            .check_runs
            .insert(key, Entry::new(runs.clone()));
        Ok(runs)
    }

    async fn get_file_contents(&self, repo: &OwnerRepo, path: &str) -> HostResult<Option<String>> {
        let key = (repo.clone(), path.to_string());
        let cached = fresh(
            self.caches.lock().await.files.get(&key),
            self.ttl.config_file,
        );
        if let Some(contents) = cached {
            return Ok(contents);
        }

        let contents = self.inner.get_file_contents(repo, path).await?;
        self.caches
            .lock()
            .await
            .files
            .insert(key, Entry::new(contents.clone()));
        Ok(contents)
    }

    async fn list_team_members(&self, org: &str, team_slug: &str) -> HostResult<Vec<User>> {
        let key = (org.to_string(), team_slug.to_string());
        let cached = fresh(self.caches.lock().await.teams.get(&key), self.ttl.team);
        if let Some(members) = cached {
            return Ok(members);
        }

        let members = self.inner.list_team_members(org, team_slug).await?;
        self.caches
            .lock()
            .await
            .teams
            .insert(key, Entry::new(members.clone()));
        Ok(members)
    }

    async fn get_authenticated_user(&self) -> HostResult<User> {
        let cached = fresh(self.caches.lock().await.user.as_ref(), self.ttl.user);
        if let Some(user) = cached {
            return Ok(user);
        }

        let user = self.inner.get_authenticated_user().await?;
        self.caches.lock().await.user = Some(Entry::new(user.clone()));
        Ok(user)
    }
}
