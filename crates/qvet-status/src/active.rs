//! Active embargoes and deployment notes

use crate::context::StatusContext;
use crate::list::StatusList;
use qvet_types::{Status, StatusState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Id-carrying status kinds that are "active" while their latest state is `failure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveKind {
    Embargo,
    DeploymentNote,
}

impl ActiveKind {
    fn id_of(self, context: &StatusContext) -> Option<&str> {
        match (self, context) {
            (Self::Embargo, StatusContext::Embargo { id }) => Some(id),
            (Self::DeploymentNote, StatusContext::DeploymentNote { id }) => Some(id),
            _ => None,
        }
    }

    pub fn context(self, id: impl Into<String>) -> StatusContext {
        match self {
            Self::Embargo => StatusContext::embargo(id),
            Self::DeploymentNote => StatusContext::deployment_note(id),
        }
    }
}

/// An embargo or deployment note currently in force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEntry {
    /// Commit the entry was recorded on
    pub sha: String,
    pub id: String,
    /// Latest status for the entry's context, carrying reason and creator
    pub status: Status,
}

/// Decode the active entries of `kind` from a commit's statuses
///
/// Yields at most one entry per id, only for ids whose latest status is
/// `failure`, ordered by the list position of that latest status.
pub fn decode_active_by_kind(sha: &str, statuses: &StatusList, kind: ActiveKind) -> Vec<ActiveEntry> {
    let mut latest: HashMap<String, (usize, &Status)> = HashMap::new();

    for (index, status) in statuses.iter().enumerate() {
        let Some(context) = StatusContext::parse(&status.context) else {
            continue;
        };
        let Some(id) = kind.id_of(&context) else {
            continue;
        };
        match latest.get(id) {
            Some((_, current)) if status.created_at <= current.created_at => {}
            _ => {
                latest.insert(id.to_string(), (index, status));
            }
        }
    }

    let mut active: Vec<(usize, ActiveEntry)> = latest
        .into_iter()
        .filter(|(_, (_, status))| status.state == StatusState::Failure)
        .map(|(id, (index, status))| {
            (
                index,
                ActiveEntry {
                    sha: sha.to_string(),
                    id,
                    status: status.clone(),
                },
            )
        })
        .collect();
    active.sort_by_key(|(index, _)| *index);
    active.into_iter().map(|(_, entry)| entry).collect()
}
