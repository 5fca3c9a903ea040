//! Tri-state for externally sourced values
//!
//! Every read from the host can be in flight, can have failed, or can have
//! produced a value. The readiness engine consumes these directly so that
//! "still loading" is never silently read as either `true` or `false`.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Loading / failed / ready value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Load<T> {
    /// The read has not completed yet
    Loading,

    /// The read failed with the given message
    Failed(String),

    /// The read produced a value
    Ready(T),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Load<T> {
    /// Convert a finished read into a load state
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Load<&T> {
        match self {
            Self::Loading => Load::Loading,
            Self::Failed(message) => Load::Failed(message.clone()),
            Self::Ready(value) => Load::Ready(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Load<U> {
        match self {
            Self::Loading => Load::Loading,
            Self::Failed(message) => Load::Failed(message),
            Self::Ready(value) => Load::Ready(f(value)),
        }
    }
}
