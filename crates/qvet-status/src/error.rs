//! Status error types

use qvet_types::HostError;
use thiserror::Error;

/// Status errors
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Description is {length} characters, at most {max} are allowed")]
    DescriptionTooLong { length: usize, max: usize },

    #[error("Failed to write status: {0}")]
    Host(#[from] HostError),
}

/// Result type for status operations
pub type Result<T> = std::result::Result<T, StatusError>;
