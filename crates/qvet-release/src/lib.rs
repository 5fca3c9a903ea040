//! # qvet Release
//!
//! Finds the two ends of the undeployed range: the tip of the base branch
//! and the newest tag identified as a production release.
//!
//! - [`resolve_base`]: base branch tip
//! - [`resolve_prod_tag`]: bounded scan of the tag listing
//! - [`resolve_range`]: both ends plus the commit comparison between them

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod resolver;

pub use error::{ReleaseError, Result};
pub use resolver::{
    base_branch, resolve_base, resolve_prod_tag, resolve_range, ReleaseRange, TAGS_PER_PAGE,
};
