//! Who should deploy
//!
//! Deployers are drawn from team members who have no commit in the release,
//! so that nobody deploys their own changes.

use crate::sample::sample;
use qvet_types::{Commit, Load, User};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of deployers suggested at random
pub const SUGGESTED_DEPLOYERS: usize = 3;

/// Deploy rotation suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "users", rename_all = "snake_case")]
pub enum Rotation {
    /// Every team member has a commit in the release
    EmergencyDeployer,

    /// The current user has no commit in the release
    ActorCanDeploy,

    /// Randomly chosen members without commits
    Suggested(Vec<User>),
}

/// Suggest deployers; `None` when the team roster is not available
pub fn suggest_rotation<R: Rng + ?Sized>(
    roster: Option<&Load<Vec<User>>>,
    commits: &[Commit],
    actor: Option<&User>,
    rng: &mut R,
) -> Option<Rotation> {
    let members = roster?.ready()?;

    let authors: HashSet<u64> = commits
        .iter()
        .filter_map(|commit| commit.author.as_ref().map(|author| author.id))
        .collect();
    let without_commits: Vec<User> = members
        .iter()
        .filter(|member| !authors.contains(&member.id))
        .cloned()
        .collect();

    if without_commits.is_empty() {
        return Some(Rotation::EmergencyDeployer);
    }
    if actor.is_some_and(|actor| without_commits.iter().any(|member| member.id == actor.id)) {
        return Some(Rotation::ActorCanDeploy);
    }
    Some(Rotation::Suggested(sample(
        &without_commits,
        SUGGESTED_DEPLOYERS,
        rng,
    )))
}
