//! Error types shared across the workspace

use thiserror::Error;

/// Errors constructing shared types
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("Invalid repository {0:?}, expected owner/repo")]
    InvalidRepo(String),
}

/// Errors reported by a source-control host
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The addressed resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials missing, expired or lacking scope
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The host is throttling requests
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl HostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for host operations
pub type HostResult<T> = std::result::Result<T, HostError>;
