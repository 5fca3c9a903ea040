//! CLI command implementations

pub mod active;
pub mod commits;
pub mod config;
pub mod overrule;
pub mod qa;
pub mod routine;
pub mod status;
pub mod whoami;
