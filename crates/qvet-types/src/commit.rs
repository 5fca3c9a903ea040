//! Commits and commit comparisons

use crate::repo::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as returned by the comparison endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash
    pub sha: String,

    /// Link to the commit page
    #[serde(default)]
    pub html_url: Option<String>,

    /// Git-level commit data
    pub commit: CommitDetail,

    /// Linked GitHub account of the author, absent for unlinked emails
    #[serde(default)]
    pub author: Option<User>,

    /// Parent commits
    #[serde(default)]
    pub parents: Vec<ParentRef>,
}

/// Git-level commit data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Full commit message
    pub message: String,

    /// Raw git author
    #[serde(default)]
    pub author: Option<GitActor>,
}

/// Raw git author/committer signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Reference to a parent commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub sha: String,
}

impl Commit {
    /// Create a single-parent commit with no linked author
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            html_url: None,
            commit: CommitDetail {
                message: message.into(),
                author: None,
            },
            author: None,
            parents: vec![ParentRef {
                sha: String::new(),
            }],
        }
    }

    /// Set the linked author
    pub fn with_author(mut self, author: User) -> Self {
        self.author = Some(author);
        self
    }

    /// Replace the parents with `count` anonymous parents
    pub fn with_parent_count(mut self, count: usize) -> Self {
        self.parents = (0..count)
            .map(|_| ParentRef {
                sha: String::new(),
            })
            .collect();
        self
    }

    pub fn message(&self) -> &str {
        &self.commit.message
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }

    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Abbreviated hash for display
    pub fn short_sha(&self) -> &str {
        let end = self.sha.len().min(7);
        &self.sha[..end]
    }
}

/// Result of comparing the production reference with the base branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitComparison {
    /// Link to the comparison page
    pub html_url: String,

    /// Commits reachable from head but not from base, oldest first
    #[serde(default)]
    pub commits: Vec<Commit>,

    /// Number of commits head is ahead of base
    #[serde(default)]
    pub ahead_by: u64,

    /// Number of commits head is behind base
    #[serde(default)]
    pub behind_by: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_helpers() {
        let commit = Commit::new("0123456789abcdef", "Fix login\n\nLonger body")
            .with_author(User::new(1, "alice"));

        assert_eq!(commit.summary(), "Fix login");
        assert_eq!(commit.short_sha(), "0123456");
        assert_eq!(commit.author_login(), Some("alice"));
        assert!(!commit.is_merge());
        assert!(commit.with_parent_count(2).is_merge());
    }

    #[test]
    fn test_comparison_deserializes_github_payload() {
        let payload = r#"{
            "html_url": "https://github.com/octo/widgets/compare/v1...abc",
            "ahead_by": 2,
            "behind_by": 0,
            "commits": [
                {
                    "sha": "aaa",
                    "html_url": "https://github.com/octo/widgets/commit/aaa",
                    "commit": {"message": "one", "author": {"name": "A", "email": "a@x", "date": "2024-01-01T00:00:00Z"}},
                    "author": {"id": 1, "login": "alice"},
                    "parents": [{"sha": "p0"}]
                },
                {
                    "sha": "bbb",
                    "commit": {"message": "Merge pull request #2"},
                    "author": null,
                    "parents": [{"sha": "aaa"}, {"sha": "p1"}]
                }
            ]
        }"#;

        let comparison: CommitComparison = serde_json::from_str(payload).unwrap();
        assert_eq!(comparison.commits.len(), 2);
        assert_eq!(comparison.commits[0].author_login(), Some("alice"));
        assert!(comparison.commits[1].author.is_none());
        assert!(comparison.commits[1].is_merge());
    }
}
