//! Voting sessions: bounded, closeable ballot scopes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle; closed is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Closed,
}

/// A bounded ballot scope for one round's voting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSession {
    pub id: Uuid,
    pub round: u32,
    /// Players that may not be voted for in this session
    #[serde(default)]
    pub immune_player_ids: Vec<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl VotingSession {
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}

/// One voter's current ballot in a session; re-casting replaces it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter: String,
    pub candidate: String,
    pub cast_at: DateTime<Utc>,
}

/// Read-time aggregation of a session's ballots
///
/// Every leader carries the same, maximal count; ties are reported as the
/// full list, never collapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTally {
    pub counts: BTreeMap<String, u32>,
    pub leaders: Vec<String>,
}
