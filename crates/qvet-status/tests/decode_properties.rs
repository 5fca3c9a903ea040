//! Property tests: active decoding reflects exactly the newest status per context.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use qvet_status::{
    decode_active_by_kind, describe_update, ActiveEntry, ActiveKind, StatusContext, StatusList,
    WriteableState,
};
use qvet_types::{Status, StatusState};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_state() -> impl Strategy<Value = StatusState> {
    prop_oneof![
        Just(StatusState::Success),
        Just(StatusState::Failure),
        Just(StatusState::Pending),
        Just(StatusState::Error),
    ]
}

fn arb_context() -> impl Strategy<Value = StatusContext> {
    let id = prop_oneof![Just("a1"), Just("b2"), Just("c3")];
    (0..3usize, id).prop_map(|(kind, id)| match kind {
        0 => StatusContext::embargo(id),
        1 => StatusContext::deployment_note(id),
        _ => StatusContext::Qa,
    })
}

/// Newest-first list with strictly decreasing timestamps
fn arb_list() -> impl Strategy<Value = Vec<Status>> {
    prop::collection::vec((arb_context(), arb_state()), 0..24).prop_map(|entries| {
        let origin = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let count = entries.len() as i64;
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (context, state))| {
                Status::new(context.to_string(), state, origin + Duration::seconds(count - i as i64))
            })
            .collect()
    })
}

fn arb_kind() -> impl Strategy<Value = ActiveKind> {
    prop_oneof![Just(ActiveKind::Embargo), Just(ActiveKind::DeploymentNote)]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// At most one entry per id, and each entry is the newest status for its context.
    #[test]
    fn decoded_entries_are_unique_and_current(statuses in arb_list(), kind in arb_kind()) {
        let list = StatusList::new(statuses.clone());
        let active = decode_active_by_kind("base", &list, kind);

        let mut seen = HashSet::new();
        for entry in &active {
            prop_assert!(seen.insert(entry.id.clone()));
            let context = kind.context(entry.id.clone()).to_string();
            let newest = statuses.iter().find(|s| s.context == context).unwrap();
            prop_assert_eq!(&entry.status, newest);
            prop_assert_eq!(entry.status.state, StatusState::Failure);
        }

        for status in &statuses {
            let is_kind = matches!(
                (kind, StatusContext::parse(&status.context)),
                (ActiveKind::Embargo, Some(StatusContext::Embargo { .. }))
                    | (ActiveKind::DeploymentNote, Some(StatusContext::DeploymentNote { .. }))
            );
            let newest_for_context =
                statuses.iter().find(|s| s.context == status.context) == Some(status);
            if is_kind && newest_for_context && status.state == StatusState::Failure {
                let id = StatusContext::parse(&status.context).unwrap().key().unwrap().to_string();
                prop_assert!(seen.contains(&id));
            }
        }
    }

    /// Re-writing the current value of a context leaves the decoded result unchanged.
    #[test]
    fn duplicate_write_is_idempotent(
        statuses in arb_list(),
        kind in arb_kind(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!statuses.is_empty());
        let before = decode_active_by_kind("base", &StatusList::new(statuses.clone()), kind);

        let target = &statuses[pick.index(statuses.len())];
        let current = statuses.iter().find(|s| s.context == target.context).unwrap().clone();
        let mut rewritten = current.clone();
        rewritten.created_at = statuses[0].created_at + Duration::seconds(1);

        let mut list = StatusList::new(statuses.clone());
        list.prepend(rewritten);
        let after = decode_active_by_kind("base", &list, kind);

        let ids = |entries: &[ActiveEntry]| {
            entries
                .iter()
                .map(|e| (e.id.clone(), e.status.state.as_str()))
                .collect::<Vec<_>>()
        };
        let mut before_ids = ids(&before);
        let mut after_ids = ids(&after);
        before_ids.sort();
        after_ids.sort();
        prop_assert_eq!(before_ids, after_ids);
    }

    /// Explicit descriptions within the limit come back unchanged.
    #[test]
    fn explicit_description_round_trips(text in "[a-zA-Z0-9 ,.!]{1,140}", actor in "[a-z]{1,12}") {
        prop_assume!(!text.trim().is_empty());
        let described = describe_update(WriteableState::Failure, &actor, Some(&text)).unwrap();
        prop_assert_eq!(described, text);
    }
}
