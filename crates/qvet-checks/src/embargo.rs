//! Whether check-runs block deployment

use crate::attempts::filter_unresolved;
use crate::level::{classify_level, missing_check_runs};
use qvet_config::{CheckRunLevel, CheckRunsConfig};
use qvet_status::{StatusContext, StatusList};
use qvet_types::{CheckRun, Load};
use tracing::debug;

/// Whether a user has overruled the embargo of the job called `name`
pub fn is_overruled(name: &str, statuses: &StatusList) -> bool {
    statuses
        .latest(&StatusContext::check_run_overrule(name))
        .is_some_and(|status| status.is_success())
}

/// Whether an embargo-level job blocks deployment
///
/// Fails open when the check-run query itself failed, so that an outage of
/// the check-run endpoint does not stop deployments; the engine shows a
/// warning instead. While either source is loading, or when the base
/// statuses could not be read, the overrules are unknown and the answer is
/// `true`.
pub fn unresolved_embargoed(
    check_runs: &Load<Vec<CheckRun>>,
    statuses: &Load<StatusList>,
    config: &CheckRunsConfig,
) -> bool {
    if !config.enabled {
        return false;
    }

    let runs = match check_runs {
        Load::Failed(_) => return false,
        Load::Loading => return true,
        Load::Ready(runs) => runs,
    };
    let statuses = match statuses {
        Load::Ready(statuses) => statuses,
        Load::Loading | Load::Failed(_) => return true,
    };

    let unresolved = filter_unresolved(runs);
    let missing = missing_check_runs(runs, config);
    let mut blocking = unresolved
        .iter()
        .map(|run| run.name.as_str())
        .chain(missing.iter().map(|item| item.name.as_str()))
        .filter(|name| classify_level(name, config) == CheckRunLevel::Embargo)
        .filter(|name| !is_overruled(name, statuses));

    match blocking.next() {
        Some(name) => {
            debug!(check_run = name, "Check-run embargo in place");
            true
        }
        None => false,
    }
}
