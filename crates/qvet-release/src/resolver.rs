//! Base and production reference resolution

use crate::error::{ReleaseError, Result};
use qvet_config::Config;
use qvet_types::{CommitComparison, OwnerRepo, SourceControl, Tag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Tags requested per page of the host listing
pub const TAGS_PER_PAGE: u32 = 100;

/// Both ends of the undeployed range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRange {
    /// Branch whose tip is the head of the range
    pub base_branch: String,
    pub base_sha: String,

    /// Newest production release, if one could be identified
    pub prod_tag: Option<Tag>,

    /// Commits from the production release to the base tip; `None` without a release
    pub comparison: Option<CommitComparison>,
}

/// Branch tracked for `config`: the configured base or the repository default
pub async fn base_branch(host: &dyn SourceControl, repo: &OwnerRepo, config: &Config) -> Result<String> {
    match &config.commit.base {
        Some(base) => Ok(base.clone()),
        None => Ok(host.get_default_branch(repo).await?),
    }
}

/// Sha at the tip of the base branch
#[instrument(skip(host, repo, config), fields(repo = %repo))]
pub async fn resolve_base(host: &dyn SourceControl, repo: &OwnerRepo, config: &Config) -> Result<String> {
    let branch = base_branch(host, repo, config).await?;
    let sha = host.get_branch_tip(repo, &branch).await?;
    debug!(branch = %branch, sha = %sha, "Resolved base");
    Ok(sha)
}

/// Newest tag matching any release identifier
///
/// Pages are scanned in host order, at most `max_pages_to_load` of them.
/// Within a page each tag is tested against each identifier in configured
/// order and the first match wins. The scan stops early when the host
/// reports no further page.
#[instrument(skip(host, repo, config), fields(repo = %repo))]
pub async fn resolve_prod_tag(
    host: &dyn SourceControl,
    repo: &OwnerRepo,
    config: &Config,
) -> Result<Option<Tag>> {
    let patterns = compile_identifiers(config)?;

    for page in 1..=config.release.max_pages_to_load {
        let listing = host.list_tags(repo, page, TAGS_PER_PAGE).await?;
        let found = listing
            .tags
            .into_iter()
            .find(|tag| patterns.iter().any(|pattern| pattern.is_match(&tag.name)));
        if let Some(tag) = found {
            debug!(tag = %tag.name, page, "Resolved production tag");
            return Ok(Some(tag));
        }
        if !listing.has_next {
            break;
        }
    }

    debug!(
        max_pages = config.release.max_pages_to_load,
        "No production tag found"
    );
    Ok(None)
}

/// Resolve both ends of the range and compare them
pub async fn resolve_range(
    host: &dyn SourceControl,
    repo: &OwnerRepo,
    config: &Config,
) -> Result<ReleaseRange> {
    let base_branch = base_branch(host, repo, config).await?;
    let base_sha = host.get_branch_tip(repo, &base_branch).await?;
    let prod_tag = resolve_prod_tag(host, repo, config).await?;

    let comparison = match &prod_tag {
        Some(tag) => Some(host.compare_commits(repo, tag.sha(), &base_sha).await?),
        None => None,
    };

    Ok(ReleaseRange {
        base_branch,
        base_sha,
        prod_tag,
        comparison,
    })
}

fn compile_identifiers(config: &Config) -> Result<Vec<Regex>> {
    config
        .release
        .identifiers
        .iter()
        .map(|identifier| {
            identifier
                .compile()
                .map_err(|source| ReleaseError::InvalidPattern {
                    pattern: identifier.pattern().to_string(),
                    source,
                })
        })
        .collect()
}
