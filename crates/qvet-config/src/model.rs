//! Normalized policy model
//!
//! Every struct carries `#[serde(default)]` so that deserializing a
//! schema-valid document substitutes the documented default for each absent
//! field. `Config::default()` is the policy used when no document exists.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag pages scanned for a production reference unless configured
pub const DEFAULT_MAX_PAGES_TO_LOAD: u32 = 3;

/// Pattern used when no release identifiers are configured
pub const DEFAULT_RELEASE_PATTERN: &str = "^v";

/// Normalized repository policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Actions surfaced to users
    pub action: ActionConfig,

    /// Which commits count as developer commits, and on which branch
    pub commit: CommitConfig,

    /// How the production reference is found
    pub release: ReleaseConfig,

    /// Team whose members rotate deployments
    pub team: Option<Team>,

    /// Manually ticked checklist items
    pub routine_checks: Vec<RoutineCheck>,

    /// Policy for externally reported check-runs
    pub check_runs: CheckRunsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionConfig {
    /// Shown when the repository is ready to deploy
    pub ready: Option<Action>,
}

/// External action offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// A named link opened in a browser
    Link { name: String, url: String },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::Link { name, .. } => name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Link { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    pub ignore: IgnoreConfig,

    /// Branch tracked instead of the repository default
    pub base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Author logins whose commits need no QA
    pub authors: Vec<String>,

    /// Skip commits with more than one parent
    pub merges: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Matchers tried in order against each tag
    pub identifiers: Vec<Identifier>,

    /// Bound on tag pages scanned
    pub max_pages_to_load: u32,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            identifiers: vec![Identifier::Tag {
                pattern: DEFAULT_RELEASE_PATTERN.to_string(),
            }],
            max_pages_to_load: DEFAULT_MAX_PAGES_TO_LOAD,
        }
    }
}

/// Matcher for the production reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Identifier {
    /// Tag whose name matches a regular expression
    Tag { pattern: String },
}

impl Identifier {
    pub fn pattern(&self) -> &str {
        match self {
            Self::Tag { pattern } => pattern,
        }
    }

    pub fn compile(&self) -> std::result::Result<Regex, regex::Error> {
        Regex::new(self.pattern())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Team {
    pub org: String,
    pub team_slug: String,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.team_slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutineCheck {
    /// Stable id, part of the status context
    pub id: String,

    /// Checklist text
    pub text: String,

    /// Further instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// How an unresolved check-run affects readiness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckRunLevel {
    /// Not shown
    #[default]
    Hidden,

    /// Shown, does not block
    Info,

    /// Blocks deployment until resolved or overruled
    Embargo,
}

impl CheckRunLevel {
    pub const ALL: [&'static str; 3] = ["hidden", "info", "embargo"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Info => "info",
            Self::Embargo => "embargo",
        }
    }
}

impl fmt::Display for CheckRunLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRunsConfig {
    pub enabled: bool,
    pub default_level: CheckRunLevel,
    pub items: Vec<CheckRunItem>,
}

impl CheckRunsConfig {
    pub fn item(&self, name: &str) -> Option<&CheckRunItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRunItem {
    /// Exact check-run name
    pub name: String,

    pub level: CheckRunLevel,

    /// Explanation of the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
