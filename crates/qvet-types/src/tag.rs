//! Tags used as production references

use serde::{Deserialize, Serialize};

/// A git tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: TagCommit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: TagCommit { sha: sha.into() },
        }
    }

    pub fn sha(&self) -> &str {
        &self.commit.sha
    }
}

/// One page of the host's tag listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPage {
    /// Tags in host order
    pub tags: Vec<Tag>,

    /// Whether the host advertises a following page
    pub has_next: bool,
}
