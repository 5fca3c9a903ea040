//! Developer commit selection

use qvet_config::IgnoreConfig;
use qvet_types::Commit;
use serde::{Deserialize, Serialize};

/// Undeployed commits split into those needing QA and those ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitSelection {
    /// Commits that need a QA decision, in comparison order
    pub developer_commits: Vec<Commit>,

    /// Commits excluded by the ignore rules
    pub ignored_commits: Vec<Commit>,

    /// Which rules are active, e.g. "merges, and authors a, b"
    pub ignored_description: Option<String>,
}

impl CommitSelection {
    pub fn select(commits: &[Commit], ignore: &IgnoreConfig) -> Self {
        let (developer_commits, ignored_commits) = commits
            .iter()
            .cloned()
            .partition(|commit| !is_ignored(commit, ignore));

        Self {
            developer_commits,
            ignored_commits,
            ignored_description: describe(ignore),
        }
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored_commits.len()
    }
}

fn is_ignored(commit: &Commit, ignore: &IgnoreConfig) -> bool {
    if ignore.merges && commit.is_merge() {
        return true;
    }
    commit
        .author_login()
        .is_some_and(|login| ignore.authors.iter().any(|ignored| ignored == login))
}

fn describe(ignore: &IgnoreConfig) -> Option<String> {
    let mut parts = Vec::new();
    if ignore.merges {
        parts.push("merges".to_string());
    }
    match ignore.authors.len() {
        0 => {}
        1 => parts.push(format!("author {}", ignore.authors[0])),
        _ => parts.push(format!("authors {}", ignore.authors.join(", "))),
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", and "))
    }
}
