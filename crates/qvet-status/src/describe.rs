//! Description text of newly written statuses

use crate::error::{Result, StatusError};
use qvet_types::StatusState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest description the host accepts, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 140;

/// States a user can write; `error` is reserved for CI systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteableState {
    Success,
    Failure,
    Pending,
}

impl WriteableState {
    /// Past-tense verb used in synthesized descriptions
    pub fn word(&self) -> &'static str {
        match self {
            Self::Success => "Completed",
            Self::Failure => "Rejected",
            Self::Pending => "Cleared",
        }
    }
}

impl From<WriteableState> for StatusState {
    fn from(state: WriteableState) -> Self {
        match state {
            WriteableState::Success => StatusState::Success,
            WriteableState::Failure => StatusState::Failure,
            WriteableState::Pending => StatusState::Pending,
        }
    }
}

impl fmt::Display for WriteableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(StatusState::from(*self).as_str())
    }
}

/// Description for a status written by `actor`
///
/// Explicit text is used verbatim. Text over [`MAX_DESCRIPTION_LENGTH`]
/// characters is refused rather than truncated. Blank or absent text
/// becomes `"<Word> by <actor>"`.
pub fn describe_update(state: WriteableState, actor: &str, explicit: Option<&str>) -> Result<String> {
    match explicit.filter(|text| !text.trim().is_empty()) {
        Some(text) => {
            let length = text.chars().count();
            if length > MAX_DESCRIPTION_LENGTH {
                return Err(StatusError::DescriptionTooLong {
                    length,
                    max: MAX_DESCRIPTION_LENGTH,
                });
            }
            Ok(text.to_string())
        }
        None => Ok(format!("{} by {}", state.word(), actor)),
    }
}
