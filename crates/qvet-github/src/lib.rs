//! # qvet GitHub
//!
//! [`SourceControl`](qvet_types::SourceControl) backed by the GitHub REST
//! API, plus a caching layer that any other host can be wrapped in.
//!
//! - [`GitHubClient`]: authenticated REST client
//! - [`CachedSource`]: per-source freshness, explicit refresh and
//!   write-through of created statuses

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cache;
pub mod client;
pub mod error;

pub use cache::{CacheTtl, CachedSource, Source};
pub use client::{GitHubClient, DEFAULT_API_URL, EXPECTED_STATUS_MAX_AGE_SECS};
pub use error::{GitHubError, Result};
