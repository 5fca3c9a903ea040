//! Status context encoding
//!
//! Every qvet status carries a context string in the `qvet/` namespace. The
//! string is derived from a [`StatusContext`] and parsed back into one; no
//! other code builds or inspects context strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Context of a commit's manual QA decision
pub const STATUS_CONTEXT_QA: &str = "qvet/qa";

/// Prefix of embargo contexts, followed by the embargo id
pub const STATUS_CONTEXT_EMBARGO_PREFIX: &str = "qvet/embargo/";

/// Prefix of deployment-note contexts, followed by the note id
pub const STATUS_CONTEXT_DEPLOYMENT_NOTE_PREFIX: &str = "qvet/deployment-note/";

/// Prefix of routine-check contexts, followed by the configured check id
pub const STATUS_CONTEXT_ROUTINE_CHECK_PREFIX: &str = "qvet/routine-check/";

/// Prefix of check-run overrule contexts, followed by the check-run name
pub const STATUS_CONTEXT_CHECK_RUN_EMBARGO_PREFIX: &str = "qvet/check-run-embargo/";

/// Decoded status context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusContext {
    /// Manual QA decision on a developer commit
    Qa,

    /// Embargo on the base commit
    Embargo { id: String },

    /// Deployment note on the base commit
    DeploymentNote { id: String },

    /// Tick of a configured routine check on the base commit
    RoutineCheck { id: String },

    /// Manual overrule of an embargo-level check-run
    CheckRunOverrule { name: String },
}

impl StatusContext {
    pub fn embargo(id: impl Into<String>) -> Self {
        Self::Embargo { id: id.into() }
    }

    pub fn deployment_note(id: impl Into<String>) -> Self {
        Self::DeploymentNote { id: id.into() }
    }

    pub fn routine_check(id: impl Into<String>) -> Self {
        Self::RoutineCheck { id: id.into() }
    }

    pub fn check_run_overrule(name: impl Into<String>) -> Self {
        Self::CheckRunOverrule { name: name.into() }
    }

    /// Decode a context string; `None` for contexts outside the qvet namespace
    pub fn parse(context: &str) -> Option<Self> {
        if context == STATUS_CONTEXT_QA {
            return Some(Self::Qa);
        }
        if let Some(id) = context.strip_prefix(STATUS_CONTEXT_EMBARGO_PREFIX) {
            return Some(Self::embargo(id));
        }
        if let Some(id) = context.strip_prefix(STATUS_CONTEXT_DEPLOYMENT_NOTE_PREFIX) {
            return Some(Self::deployment_note(id));
        }
        if let Some(id) = context.strip_prefix(STATUS_CONTEXT_ROUTINE_CHECK_PREFIX) {
            return Some(Self::routine_check(id));
        }
        if let Some(name) = context.strip_prefix(STATUS_CONTEXT_CHECK_RUN_EMBARGO_PREFIX) {
            return Some(Self::check_run_overrule(name));
        }
        None
    }

    /// The id or name carried by the context, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Qa => None,
            Self::Embargo { id } | Self::DeploymentNote { id } | Self::RoutineCheck { id } => {
                Some(id)
            }
            Self::CheckRunOverrule { name } => Some(name),
        }
    }
}

impl fmt::Display for StatusContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qa => f.write_str(STATUS_CONTEXT_QA),
            Self::Embargo { id } => write!(f, "{}{}", STATUS_CONTEXT_EMBARGO_PREFIX, id),
            Self::DeploymentNote { id } => {
                write!(f, "{}{}", STATUS_CONTEXT_DEPLOYMENT_NOTE_PREFIX, id)
            }
            Self::RoutineCheck { id } => {
                write!(f, "{}{}", STATUS_CONTEXT_ROUTINE_CHECK_PREFIX, id)
            }
            Self::CheckRunOverrule { name } => {
                write!(f, "{}{}", STATUS_CONTEXT_CHECK_RUN_EMBARGO_PREFIX, name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 5] = [
        STATUS_CONTEXT_QA,
        STATUS_CONTEXT_EMBARGO_PREFIX,
        STATUS_CONTEXT_DEPLOYMENT_NOTE_PREFIX,
        STATUS_CONTEXT_ROUTINE_CHECK_PREFIX,
        STATUS_CONTEXT_CHECK_RUN_EMBARGO_PREFIX,
    ];

    #[test]
    fn test_no_constant_prefixes_another() {
        for a in ALL {
            for b in ALL {
                if a != b {
                    assert!(!b.starts_with(a), "{} prefixes {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(StatusContext::Qa.to_string(), "qvet/qa");
        assert_eq!(
            StatusContext::deployment_note("ab12").to_string(),
            "qvet/deployment-note/ab12"
        );
        assert_eq!(
            StatusContext::routine_check("smoke").to_string(),
            "qvet/routine-check/smoke"
        );
        assert_eq!(
            StatusContext::check_run_overrule("e2e / chrome").to_string(),
            "qvet/check-run-embargo/e2e / chrome"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(StatusContext::parse("qvet/qa"), Some(StatusContext::Qa));
        assert_eq!(
            StatusContext::parse("qvet/check-run-embargo/lint"),
            Some(StatusContext::check_run_overrule("lint"))
        );
        assert_eq!(StatusContext::parse("qvet/qa/extra"), None);
        assert_eq!(StatusContext::parse("continuous-integration/jenkins"), None);
    }

    #[test]
    fn test_key() {
        assert_eq!(StatusContext::Qa.key(), None);
        assert_eq!(StatusContext::embargo("ff").key(), Some("ff"));
    }
}
