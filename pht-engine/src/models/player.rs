//! Player roster entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered competitor
///
/// `preferred_name` is the document key across every round collection, so
/// it is immutable once any run or ballot references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub preferred_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    /// Hours in Phasmophobia at admission time
    #[serde(default)]
    pub phasmo_hours: f64,
    #[serde(default)]
    pub prestige_at_admission: u32,
    /// Competed in a previous tourney
    #[serde(default)]
    pub previous_tourney: bool,
    pub registered_at: DateTime<Utc>,
}
