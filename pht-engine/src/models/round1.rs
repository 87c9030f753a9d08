//! Round-1 state: wildcard draws, qualifying runs, immunity and nomination

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One option from the global wildcard pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildcardChoice {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// The fixed-size random subset dealt to one player
///
/// Persisted on first request and returned unchanged ever after.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDraw {
    pub player: String,
    pub choices: Vec<WildcardChoice>,
    pub drawn_at: DateTime<Utc>,
}

/// Per-player state within a round, keyed by player name
///
/// Round 1 uses all the fields; round 3 reuses the type for partner ballots
/// and judged immunity, leaving the run metrics unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_wildcard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_for: Option<String>,
    #[serde(default)]
    pub immune: bool,
    #[serde(default)]
    pub nominated: bool,
    /// Marks scored by the qualifying run (higher is better)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
    /// Qualifying run duration; lower breaks mark ties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_time_ms: Option<u64>,
}

/// Immunity decision for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunityMark {
    pub name: String,
    pub immune: bool,
}

/// Result of a round-1 nomination tally
///
/// `nominated` stays empty on a tie between leading candidates: the engine
/// reports, an admin decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominated: Option<String>,
    pub tally: BTreeMap<String, u32>,
}
