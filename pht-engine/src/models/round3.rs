//! Round-3 teams and head-to-head elimination matches

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pair of players competing together
///
/// Member order is canonical (sorted), so `[a, b]` and `[b, a]` are the same
/// team and share one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub members: [String; 2],
    /// Current run result; re-submission replaces it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Round-level metadata persisted alongside the team documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentMeta {
    /// The odd player out when the roster is odd
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leftover: Option<String>,
    pub set_at: DateTime<Utc>,
}

/// The accepted team set for the round, as read back by the site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssignment {
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leftover: Option<String>,
}

/// Head-to-head elimination lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Resolved,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Resolved)
    }
}

/// One side's submitted elimination run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminationRun {
    pub money: i64,
    pub submitted_at: DateTime<Utc>,
}

/// A 1v1 money run-off between two members of an eliminated team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminationMatch {
    pub members: [String; 2],
    pub status: MatchStatus,
    /// Submitted results keyed by member name
    #[serde(default)]
    pub runs: BTreeMap<String, EliminationRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Outcome of a resolution attempt
///
/// An exact money tie is reported, never auto-broken; the match stays
/// in_progress until an admin orders a re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum EliminationOutcome {
    /// Strictly higher money
    Winner { winner: String, loser: String },
    /// Both sides banked the same amount
    Tie { money: i64 },
}
