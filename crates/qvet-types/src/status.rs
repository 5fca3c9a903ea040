//! Generic commit statuses
//!
//! A status is the host's `(context, state, description)` record attached to
//! a commit. qvet keeps all of its state in these records; the meaning of a
//! context string is owned by the status codec.

use crate::repo::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Success,
    Failure,
    Pending,
    Error,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Pending => "pending",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit status entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Host-assigned id
    #[serde(default)]
    pub id: u64,

    /// Namespaced key
    pub context: String,

    /// Current state
    pub state: StatusState,

    /// Free text shown next to the state
    #[serde(default)]
    pub description: Option<String>,

    /// Account that created the entry
    #[serde(default)]
    pub creator: Option<User>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Link attached to the entry
    #[serde(default)]
    pub target_url: Option<String>,
}

impl Status {
    pub fn new(context: impl Into<String>, state: StatusState, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            context: context.into(),
            state,
            description: None,
            creator: None,
            created_at,
            target_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_creator(mut self, creator: User) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn is_success(&self) -> bool {
        self.state == StatusState::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserializes_github_payload() {
        let payload = r#"{
            "id": 42,
            "context": "qvet/qa",
            "state": "success",
            "description": "Completed by alice",
            "target_url": null,
            "creator": {"id": 1, "login": "alice"},
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        }"#;

        let status: Status = serde_json::from_str(payload).unwrap();
        assert_eq!(status.state, StatusState::Success);
        assert!(status.is_success());
        assert_eq!(status.creator.unwrap().login, "alice");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(StatusState::Failure.to_string(), "failure");
        assert_eq!(
            serde_json::to_string(&StatusState::Pending).unwrap(),
            "\"pending\""
        );
    }
}
