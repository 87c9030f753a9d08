//! Persisted entity types
//!
//! Everything here round-trips through the document store as camelCase JSON,
//! matching the collection layout the site's pages read.

mod player;
mod round1;
mod round2;
mod round3;
mod session;

pub use player::Player;
pub use round1::{ChoiceDraw, ImmunityMark, PlayerRoundState, VotingOutcome, WildcardChoice};
pub use round2::MoneyEntry;
pub use round3::{
    AssignmentMeta, EliminationMatch, EliminationOutcome, EliminationRun, MatchStatus, Team,
    TeamAssignment,
};
pub use session::{SessionStatus, SessionTally, Vote, VotingSession};
