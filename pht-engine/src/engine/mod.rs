//! Tournament round engine
//!
//! Writers validate inputs, read current store state, and issue idempotent
//! or last-writer-wins document writes; the pure decision functions live in
//! `outcome`. Nothing here caches state across requests, so every decision
//! reflects the store at the moment it was asked for.

pub mod draw;
pub mod elimination;
pub mod outcome;
pub mod registry;
pub mod round1;
pub mod round2;
pub mod round3;
pub mod sessions;

/// Wildcard options dealt per player in round 1
pub const WILDCARD_DRAW_SIZE: usize = 3;

/// Immunity slots awarded by the round-1 qualifying runs
pub const ROUND1_IMMUNITY_SLOTS: usize = 2;

/// Surviving players required to enter round 3
pub const ROUND3_PLAYER_COUNT: usize = 7;

/// Collection names in the document store
pub mod collections {
    pub const PLAYERS: &str = "players";
    pub const ROUND1_CHOICES: &str = "round1_choices";
    pub const ROUND1_STATE: &str = "round1_state";
    pub const ROUND2_ENTRIES: &str = "round2_entries";
    pub const ROUND3_STATE: &str = "round3_state";
    pub const ROUND3_TEAMS: &str = "round3_teams";
    pub const ROUND3_META: &str = "round3_meta";
    pub const ROUND3_ELIMS: &str = "round3_elims";
    pub const VOTE_SESSIONS: &str = "vote_sessions";
    pub const SESSION_VOTES: &str = "session_votes";
}
