//! # qvet Checks
//!
//! Turns the check-runs reported against the base commit into findings:
//!
//! - [`filter_latest_attempts`] collapses retries of the same job
//! - [`classify_level`] applies the configured level of a job
//! - [`missing_check_runs`] lists configured jobs that never reported
//! - [`unresolved_embargoed`] decides whether check-runs block deployment
//! - [`assess`] produces the findings shown to users

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod assess;
pub mod attempts;
pub mod embargo;
pub mod level;

pub use assess::{assess, CheckRunAssessment, CheckRunFinding};
pub use attempts::{filter_latest_attempts, filter_unresolved};
pub use embargo::{is_overruled, unresolved_embargoed};
pub use level::{classify_level, config_url, missing_check_runs};
