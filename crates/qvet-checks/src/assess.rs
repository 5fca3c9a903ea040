//! Check-run findings for display

use crate::attempts::filter_unresolved;
use crate::embargo::is_overruled;
use crate::level::{classify_level, config_url, missing_check_runs};
use qvet_config::{CheckRunLevel, CheckRunsConfig};
use qvet_status::StatusList;
use qvet_types::{CheckRun, CheckRunConclusion, CheckRunStatus};
use serde::{Deserialize, Serialize};

/// What is wrong with a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckRunFinding {
    /// Configured but never reported against the base commit
    Missing,

    /// Latest attempt is incomplete or did not succeed
    Unresolved {
        status: CheckRunStatus,
        conclusion: Option<CheckRunConclusion>,
        details_url: Option<String>,
    },
}

/// A job that needs attention, with its configured level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRunAssessment {
    pub name: String,
    pub level: CheckRunLevel,
    pub finding: CheckRunFinding,

    /// Configured explanation of the job
    pub config_url: Option<String>,

    /// A user lifted the embargo through a status
    pub overruled: bool,
}

impl CheckRunAssessment {
    /// Blocks deployment unless overruled
    pub fn is_blocking(&self) -> bool {
        self.level == CheckRunLevel::Embargo && !self.overruled
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.finding, CheckRunFinding::Missing)
    }
}

/// Findings for every non-hidden job: missing jobs first, then unresolved ones
///
/// Overrules are only known when `statuses` is given. Nothing is reported
/// while check-runs are disabled.
pub fn assess(
    runs: &[CheckRun],
    statuses: Option<&StatusList>,
    config: &CheckRunsConfig,
) -> Vec<CheckRunAssessment> {
    if !config.enabled {
        return Vec::new();
    }

    let overruled = |name: &str| statuses.is_some_and(|statuses| is_overruled(name, statuses));

    let missing = missing_check_runs(runs, config)
        .into_iter()
        .map(|item| CheckRunAssessment {
            name: item.name.clone(),
            level: item.level,
            finding: CheckRunFinding::Missing,
            config_url: item.url.clone(),
            overruled: overruled(&item.name),
        });

    let unresolved = filter_unresolved(runs)
        .into_iter()
        .filter_map(|run| {
            let level = classify_level(&run.name, config);
            if level == CheckRunLevel::Hidden {
                return None;
            }
            Some(CheckRunAssessment {
                level,
                finding: CheckRunFinding::Unresolved {
                    status: run.status,
                    conclusion: run.conclusion,
                    details_url: run.details_url.clone(),
                },
                config_url: config_url(&run.name, config).map(str::to_string),
                overruled: overruled(&run.name),
                name: run.name,
            })
        });

    missing.chain(unresolved).collect()
}
