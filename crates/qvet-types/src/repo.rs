//! Repository and user identity

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repository addressed as `owner/repo`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRepo {
    /// Owning user or organization login
    pub owner: String,

    /// Repository name
    pub repo: String,
}

impl OwnerRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for OwnerRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for OwnerRepo {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, repo) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| TypesError::InvalidRepo(s.to_string()))?;

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(TypesError::InvalidRepo(s.to_string()));
        }

        Ok(Self::new(owner, repo))
    }
}

/// A GitHub account as embedded in commits, statuses and team rosters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Stable numeric account id
    pub id: u64,

    /// Login handle
    pub login: String,

    /// Profile page
    #[serde(default)]
    pub html_url: Option<String>,

    /// Avatar image
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            html_url: None,
            avatar_url: None,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo() {
        let repo: OwnerRepo = "octo/widgets".parse().unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.repo, "widgets");
        assert_eq!(repo.to_string(), "octo/widgets");
    }

    #[test]
    fn test_parse_owner_repo_rejects_malformed() {
        assert!("octo".parse::<OwnerRepo>().is_err());
        assert!("/widgets".parse::<OwnerRepo>().is_err());
        assert!("octo/".parse::<OwnerRepo>().is_err());
        assert!("octo/widgets/extra".parse::<OwnerRepo>().is_err());
    }

    #[test]
    fn test_user_deserializes_simple_user_payload() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "login": "alice", "html_url": "https://github.com/alice", "type": "User"}"#,
        )
        .unwrap();
        assert_eq!(user.login, "alice");
        assert_eq!(user.html_url.as_deref(), Some("https://github.com/alice"));
        assert!(user.avatar_url.is_none());
    }
}
