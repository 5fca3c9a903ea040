//! # qvet Readiness
//!
//! Decides whether the undeployed commits of a repository can be deployed.
//!
//! ## Overview
//!
//! Evaluation is a pure function of a [`Snapshot`] of everything read from
//! the host. Each source is a [`Load`](qvet_types::Load): a source that is
//! still loading or failed to load is never silently read as a pass.
//!
//! The verdict is the conjunction of four predicates:
//!
//! - **no embargoes**: no active embargo, no blocking check-run
//! - **all QA success**: every developer commit has a successful QA status
//! - **has commits**: there is something to deploy
//! - **routine checks complete**: every configured routine check is ticked
//!
//! ## Example
//!
//! ```rust,no_run
//! use qvet_config::ConfigMeta;
//! use qvet_readiness::{collect_snapshot, evaluate};
//! use qvet_types::{InMemorySourceControl, OwnerRepo};
//!
//! # async fn example() {
//! let host = InMemorySourceControl::new();
//! let repo = OwnerRepo::new("octo", "widgets");
//! let snapshot = collect_snapshot(&host, &repo, None, ConfigMeta::from_file(None)).await;
//! let report = evaluate(&snapshot.inputs(), &mut rand::thread_rng());
//! println!("ready: {}", report.ready_to_deploy);
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod engine;
pub mod rotation;
pub mod sample;
pub mod selection;
pub mod snapshot;

pub use engine::{evaluate, Alert, AlertSeverity, Predicates, ReadinessInputs, ReadinessReport};
pub use rotation::{suggest_rotation, Rotation, SUGGESTED_DEPLOYERS};
pub use sample::sample;
pub use selection::CommitSelection;
pub use snapshot::{collect_snapshot, Snapshot};
