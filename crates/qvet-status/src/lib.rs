//! # qvet Status
//!
//! All durable qvet state lives in commit statuses. This crate owns the
//! encoding of that state:
//!
//! - [`StatusContext`]: the tagged union behind every context string
//! - [`StatusList`]: a commit's statuses with "latest per context" lookup
//! - [`decode_active_by_kind`]: active embargoes and deployment notes
//! - [`describe_update`]: description text for new entries
//! - [`StatusWriter`]: the write path for QA decisions, embargoes, notes,
//!   routine checks and check-run overrules
//!
//! ## Example
//!
//! ```rust
//! use qvet_status::StatusContext;
//!
//! let context = StatusContext::embargo("1f3a9c");
//! assert_eq!(context.to_string(), "qvet/embargo/1f3a9c");
//! assert_eq!(StatusContext::parse("qvet/embargo/1f3a9c"), Some(context));
//! assert_eq!(StatusContext::parse("ci/build"), None);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod active;
pub mod context;
pub mod describe;
pub mod error;
pub mod list;
pub mod writer;

pub use active::{decode_active_by_kind, ActiveEntry, ActiveKind};
pub use context::{
    StatusContext, STATUS_CONTEXT_CHECK_RUN_EMBARGO_PREFIX, STATUS_CONTEXT_DEPLOYMENT_NOTE_PREFIX,
    STATUS_CONTEXT_EMBARGO_PREFIX, STATUS_CONTEXT_QA, STATUS_CONTEXT_ROUTINE_CHECK_PREFIX,
};
pub use describe::{describe_update, WriteableState, MAX_DESCRIPTION_LENGTH};
pub use error::{Result, StatusError};
pub use list::StatusList;
pub use writer::{random_hex_id, StatusUpdate, StatusWriter};
