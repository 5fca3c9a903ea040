//! Externally reported check-runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a check-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

impl CheckRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Requested => "requested",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a completed check-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    #[serde(other)]
    Unknown,
}

impl CheckRunConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::TimedOut => "timed_out",
            Self::ActionRequired => "action_required",
            Self::Stale => "stale",
            Self::StartupFailure => "startup_failure",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckRunConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attempt of an external CI job against a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Host-assigned id
    #[serde(default)]
    pub id: u64,

    /// Job name, shared by retries
    pub name: String,

    /// Progress
    pub status: CheckRunStatus,

    /// Outcome, set once completed
    #[serde(default)]
    pub conclusion: Option<CheckRunConclusion>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Link to the job's own page
    #[serde(default)]
    pub details_url: Option<String>,
}

impl CheckRun {
    /// A run that has started but not finished
    pub fn in_progress(name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            status: CheckRunStatus::InProgress,
            conclusion: None,
            started_at: Some(started_at),
            completed_at: None,
            details_url: None,
        }
    }

    /// A run that finished with `conclusion`
    pub fn completed(
        name: impl Into<String>,
        conclusion: CheckRunConclusion,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            status: CheckRunStatus::Completed,
            conclusion: Some(conclusion),
            started_at: Some(completed_at),
            completed_at: Some(completed_at),
            details_url: None,
        }
    }

    pub fn with_details_url(mut self, url: impl Into<String>) -> Self {
        self.details_url = Some(url.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == CheckRunStatus::Completed
    }

    pub fn is_success(&self) -> bool {
        self.conclusion == Some(CheckRunConclusion::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_run_deserializes_with_unknown_values() {
        let payload = r#"{
            "id": 9,
            "name": "deploy-preview",
            "status": "some_future_status",
            "conclusion": null,
            "started_at": "2024-03-01T12:00:00Z",
            "completed_at": null,
            "details_url": "https://ci.example.com/9"
        }"#;

        let run: CheckRun = serde_json::from_str(payload).unwrap();
        assert_eq!(run.status, CheckRunStatus::Unknown);
        assert!(!run.is_completed());
        assert!(run.conclusion.is_none());
    }

    #[test]
    fn test_conclusion_wire_names() {
        let run: CheckRun = serde_json::from_str(
            r#"{"name": "lint", "status": "completed", "conclusion": "timed_out"}"#,
        )
        .unwrap();
        assert_eq!(run.conclusion, Some(CheckRunConclusion::TimedOut));
        assert_eq!(CheckRunStatus::InProgress.to_string(), "in_progress");
    }
}
