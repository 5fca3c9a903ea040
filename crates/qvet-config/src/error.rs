//! Config error types

use qvet_types::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One violated constraint of the policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending node, rooted at `config`
    pub path: String,

    /// What is wrong with it
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The policy document could not be fetched
    #[error("Failed to load config file: {0}")]
    Host(#[from] HostError),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
