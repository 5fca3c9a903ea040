//! GitHub client error types

use qvet_types::HostError;
use thiserror::Error;

/// GitHub client errors
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API URL cannot be used as a base: {0}")]
    BaseUrl(String),

    #[error("Invalid token: {0}")]
    Token(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<GitHubError> for HostError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::NotFound(message) => HostError::NotFound(message),
            GitHubError::Unauthorized(message) => HostError::Unauthorized(message),
            GitHubError::RateLimited(message) => HostError::RateLimited(message),
            GitHubError::Api { status, message } => HostError::Api { status, message },
            GitHubError::Decode(message) => HostError::Decode(message),
            GitHubError::Http(e) if e.is_decode() => HostError::Decode(e.to_string()),
            other => HostError::Transport(other.to_string()),
        }
    }
}

/// Result type for GitHub client operations
pub type Result<T> = std::result::Result<T, GitHubError>;
