//! qvet Types - Shared domain types for deployment readiness
//!
//! These types mirror the subset of the GitHub REST surface the readiness
//! core consumes. They are read-only snapshots of host-owned entities: the
//! core never mutates a commit, tag or check-run, and the only thing it
//! writes back is a new commit status.
//!
//! ## Key Concepts
//!
//! - **Commit**: an undeployed change between the production reference and the base branch
//! - **Status**: a generic commit status, the carrier for every piece of qvet state
//! - **CheckRun**: an externally reported CI job result
//! - **Tag**: a candidate production reference
//! - **Load**: loading / failed / ready tri-state for externally sourced values
//! - **SourceControl**: the collaborator trait the core reads from and writes to

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod check_run;
pub mod commit;
pub mod error;
pub mod host;
pub mod load;
pub mod memory;
pub mod repo;
pub mod status;
pub mod tag;

pub use check_run::{CheckRun, CheckRunConclusion, CheckRunStatus};
pub use commit::{Commit, CommitComparison, CommitDetail, GitActor, ParentRef};
pub use error::{HostError, HostResult, TypesError};
pub use host::{NewStatus, SourceControl};
pub use load::Load;
pub use memory::{HostOperation, InMemorySourceControl};
pub use repo::{OwnerRepo, User};
pub use status::{Status, StatusState};
pub use tag::{Tag, TagCommit, TagPage};
