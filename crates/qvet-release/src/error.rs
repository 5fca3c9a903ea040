//! Release resolution error types

use qvet_types::HostError;
use thiserror::Error;

/// Release resolution errors
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Invalid release identifier pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for release resolution
pub type Result<T> = std::result::Result<T, ReleaseError>;
