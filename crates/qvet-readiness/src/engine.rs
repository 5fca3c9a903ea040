//! Readiness evaluation
//!
//! [`evaluate`] is synchronous and deterministic for a given random source:
//! all I/O happens before it, while the snapshot is collected.

use crate::rotation::{suggest_rotation, Rotation};
use qvet_checks::{assess, unresolved_embargoed, CheckRunAssessment};
use qvet_config::{Action, Config};
use qvet_status::{decode_active_by_kind, ActiveEntry, ActiveKind, StatusContext, StatusList};
use qvet_types::{CheckRun, Commit, Load, User};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Everything evaluation reads, borrowed from a snapshot
#[derive(Debug, Clone, Copy)]
pub struct ReadinessInputs<'a> {
    pub config: &'a Config,

    /// Tip of the base branch, where embargoes, notes and routine checks live
    pub base_sha: &'a str,

    /// Commits that need QA; empty when the range is unknown
    pub developer_commits: &'a [Commit],

    /// Status lists of developer commits keyed by sha; absent means loading
    pub qa_statuses: &'a HashMap<String, Load<StatusList>>,

    pub base_statuses: &'a Load<StatusList>,
    pub check_runs: &'a Load<Vec<CheckRun>>,

    /// Team roster; `None` when no team is configured
    pub team_members: Option<&'a Load<Vec<User>>>,

    /// The user viewing the report
    pub actor: Option<&'a User>,
}

/// The individual conditions behind the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicates {
    pub no_embargoes: bool,
    pub all_qa_success: bool,
    pub has_commits: bool,
    pub routine_checks_complete: bool,
}

impl Predicates {
    pub fn all(&self) -> bool {
        self.no_embargoes && self.all_qa_success && self.has_commits && self.routine_checks_complete
    }
}

/// How prominently an alert is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Info,
    Warning,
}

/// Something the user should know before deploying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// Active embargo on the base commit
    Embargo { entry: ActiveEntry },

    /// Active deployment note on the base commit
    DeploymentNote { entry: ActiveEntry },

    /// Check-runs could not be read, so they are not blocking
    CheckRunsUnavailable { message: String },

    /// Configured job that never reported
    MissingCheckRun { assessment: CheckRunAssessment },

    /// Job whose latest attempt is incomplete or failed
    UnresolvedCheckRun { assessment: CheckRunAssessment },

    /// Every predicate holds
    Ready {
        action: Option<Action>,
        rotation: Option<Rotation>,
    },
}

impl Alert {
    pub fn severity(&self) -> AlertSeverity {
        match self {
            Self::Embargo { .. } | Self::CheckRunsUnavailable { .. } => AlertSeverity::Warning,
            Self::DeploymentNote { .. } => AlertSeverity::Info,
            Self::MissingCheckRun { assessment } | Self::UnresolvedCheckRun { assessment } => {
                if assessment.is_blocking() {
                    AlertSeverity::Warning
                } else {
                    AlertSeverity::Info
                }
            }
            Self::Ready { .. } => AlertSeverity::Success,
        }
    }
}

/// Verdict with its reasons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub ready_to_deploy: bool,
    pub predicates: Predicates,

    /// Ordered: embargoes, notes, check-run notices, then the ready entry
    pub alerts: Vec<Alert>,
}

/// Evaluate readiness; `rng` drives the deploy rotation suggestion
pub fn evaluate<R: Rng + ?Sized>(inputs: &ReadinessInputs<'_>, rng: &mut R) -> ReadinessReport {
    let config = inputs.config;
    let base_statuses = inputs.base_statuses.ready();

    let embargoes = base_statuses
        .map(|statuses| decode_active_by_kind(inputs.base_sha, statuses, ActiveKind::Embargo));
    let notes = base_statuses
        .map(|statuses| {
            decode_active_by_kind(inputs.base_sha, statuses, ActiveKind::DeploymentNote)
        })
        .unwrap_or_default();

    let check_run_embargo =
        unresolved_embargoed(inputs.check_runs, inputs.base_statuses, &config.check_runs);

    let predicates = Predicates {
        no_embargoes: embargoes.as_ref().is_some_and(|e| e.is_empty()) && !check_run_embargo,
        all_qa_success: all_qa_success(inputs),
        has_commits: !inputs.developer_commits.is_empty(),
        routine_checks_complete: routine_checks_complete(inputs),
    };
    let ready_to_deploy = predicates.all();
    debug!(?predicates, ready_to_deploy, "Evaluated readiness");

    let mut alerts: Vec<Alert> = Vec::new();
    alerts.extend(
        embargoes
            .unwrap_or_default()
            .into_iter()
            .map(|entry| Alert::Embargo { entry }),
    );
    alerts.extend(notes.into_iter().map(|entry| Alert::DeploymentNote { entry }));

    if config.check_runs.enabled {
        match inputs.check_runs {
            Load::Failed(message) => alerts.push(Alert::CheckRunsUnavailable {
                message: message.clone(),
            }),
            Load::Ready(runs) => {
                let (missing, unresolved): (Vec<_>, Vec<_>) =
                    assess(runs, base_statuses, &config.check_runs)
                        .into_iter()
                        .partition(CheckRunAssessment::is_missing);
                alerts.extend(
                    missing
                        .into_iter()
                        .map(|assessment| Alert::MissingCheckRun { assessment }),
                );
                alerts.extend(
                    unresolved
                        .into_iter()
                        .map(|assessment| Alert::UnresolvedCheckRun { assessment }),
                );
            }
            Load::Loading => {}
        }
    }

    if ready_to_deploy {
        alerts.push(Alert::Ready {
            action: config.action.ready.clone(),
            rotation: suggest_rotation(
                inputs.team_members,
                inputs.developer_commits,
                inputs.actor,
                rng,
            ),
        });
    }

    ReadinessReport {
        ready_to_deploy,
        predicates,
        alerts,
    }
}

// Fails closed: a commit whose statuses are loading or failed is not approved.
fn all_qa_success(inputs: &ReadinessInputs<'_>) -> bool {
    inputs.developer_commits.iter().all(|commit| {
        inputs
            .qa_statuses
            .get(&commit.sha)
            .and_then(Load::ready)
            .and_then(|statuses| statuses.latest(&StatusContext::Qa))
            .is_some_and(|status| status.is_success())
    })
}

// Fails open on a failed read so that a status outage does not block deploys.
fn routine_checks_complete(inputs: &ReadinessInputs<'_>) -> bool {
    let checks = &inputs.config.routine_checks;
    if checks.is_empty() {
        return true;
    }
    match inputs.base_statuses {
        Load::Loading => false,
        Load::Failed(_) => true,
        Load::Ready(statuses) => checks.iter().all(|check| {
            statuses
                .latest(&StatusContext::routine_check(&check.id))
                .is_some_and(|status| status.is_success())
        }),
    }
}
