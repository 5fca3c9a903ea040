//! # qvet Config
//!
//! Parses the repository-hosted policy document (`qvet.yml`) into a fully
//! populated [`Config`].
//!
//! Parsing never fails. A missing document is the default policy; a document
//! that violates the schema also yields the default policy, together with a
//! human-readable list of every violated constraint.
//!
//! ```rust
//! use qvet_config::parse_config_file;
//!
//! let result = parse_config_file(Some("commit:\n  ignore:\n    merges: true\n"));
//! assert!(result.errors_text.is_none());
//! assert!(result.config.commit.ignore.merges);
//!
//! let invalid = parse_config_file(Some("unknown: 1"));
//! assert!(invalid.errors_text.is_some());
//! assert_eq!(invalid.config, parse_config_file(None).config);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod meta;
pub mod model;
pub mod parse;
pub mod schema;

pub use error::{ConfigError, Result, ValidationError};
pub use meta::{ConfigMeta, ConfigStatus, CONFIG_FILE_PATH};
pub use model::{
    Action, ActionConfig, CheckRunItem, CheckRunLevel, CheckRunsConfig, CommitConfig, Config,
    Identifier, IgnoreConfig, ReleaseConfig, RoutineCheck, Team, DEFAULT_MAX_PAGES_TO_LOAD,
    DEFAULT_RELEASE_PATTERN,
};
pub use parse::{parse_config_file, ParseConfigFileResult};
