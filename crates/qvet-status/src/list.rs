//! A commit's statuses and "latest per context" resolution
//!
//! Statuses are append-only: a context's current value is its most recent
//! entry. Recency is decided by `created_at`; entries with equal timestamps
//! fall back to list order, where the earlier entry wins. Hosts list newest
//! first, so for them this is simply the first entry with the context.

use crate::context::StatusContext;
use qvet_types::Status;
use serde::{Deserialize, Serialize};

/// Statuses of one commit, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusList {
    statuses: Vec<Status>,
}

impl StatusList {
    pub fn new(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }

    /// Most recent status for `context`
    pub fn latest(&self, context: &StatusContext) -> Option<&Status> {
        self.latest_raw(&context.to_string())
    }

    /// Most recent status for a raw context string
    pub fn latest_raw(&self, context: &str) -> Option<&Status> {
        self.latest_indexed(|c| c == context).map(|(_, status)| status)
    }

    /// Most recent entry among those whose context matches, with its position
    pub(crate) fn latest_indexed<F>(&self, matches: F) -> Option<(usize, &Status)>
    where
        F: Fn(&str) -> bool,
    {
        let mut best: Option<(usize, &Status)> = None;
        for (index, status) in self.statuses.iter().enumerate() {
            if !matches(&status.context) {
                continue;
            }
            match best {
                Some((_, current)) if status.created_at <= current.created_at => {}
                _ => best = Some((index, status)),
            }
        }
        best
    }

    /// Record a freshly written status as the newest entry
    pub fn prepend(&mut self, status: Status) {
        self.statuses.insert(0, status);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn into_inner(self) -> Vec<Status> {
        self.statuses
    }
}

impl From<Vec<Status>> for StatusList {
    fn from(statuses: Vec<Status>) -> Self {
        Self::new(statuses)
    }
}

impl<'a> IntoIterator for &'a StatusList {
    type Item = &'a Status;
    type IntoIter = std::slice::Iter<'a, Status>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}
