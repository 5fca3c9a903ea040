//! Retry deduplication

use qvet_types::CheckRun;

/// Keep one attempt per job name, in first-seen name order
///
/// An attempt that has not completed always wins, the most recently started
/// one if there are several. Otherwise the most recently completed attempt
/// wins. Ties keep the earlier attempt in the input.
pub fn filter_latest_attempts(runs: &[CheckRun]) -> Vec<CheckRun> {
    let mut groups: Vec<(&str, Vec<&CheckRun>)> = Vec::new();
    for run in runs {
        match groups.iter_mut().find(|(name, _)| *name == run.name) {
            Some((_, attempts)) => attempts.push(run),
            None => groups.push((&run.name, vec![run])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(_, attempts)| latest_attempt(&attempts).cloned())
        .collect()
}

/// Latest attempts that did not conclude with success
pub fn filter_unresolved(runs: &[CheckRun]) -> Vec<CheckRun> {
    filter_latest_attempts(runs)
        .into_iter()
        .filter(|run| !run.is_success())
        .collect()
}

fn latest_attempt<'a>(attempts: &[&'a CheckRun]) -> Option<&'a CheckRun> {
    let incomplete = newest(
        attempts.iter().copied().filter(|run| !run.is_completed()),
        |run| run.started_at,
    );
    incomplete.or_else(|| newest(attempts.iter().copied(), |run| run.completed_at))
}

fn newest<'a, I, K, F>(runs: I, key: F) -> Option<&'a CheckRun>
where
    I: Iterator<Item = &'a CheckRun>,
    K: PartialOrd,
    F: Fn(&CheckRun) -> K,
{
    runs.fold(None, |best: Option<&'a CheckRun>, run| match best {
        Some(current) if key(run) <= key(current) => Some(current),
        _ => Some(run),
    })
}
