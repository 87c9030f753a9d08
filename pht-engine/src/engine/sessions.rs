//! Voting session lifecycle and tallies
//!
//! Votes for a session live under keys of the form `{session_id}/{voter}`,
//! so one prefix scan returns a session's whole ballot box and re-casting a
//! ballot overwrites in place.

use serde_json::json;
use uuid::Uuid;

use pht_common::store::{from_document, to_document};
use pht_common::{time, Error, Result, Store};

use crate::engine::{collections, outcome};
use crate::models::{SessionStatus, SessionTally, Vote, VotingSession};

fn vote_key(session_id: Uuid, voter: &str) -> String {
    format!("{}/{}", session_id, voter)
}

fn vote_prefix(session_id: Uuid) -> String {
    format!("{}/", session_id)
}

/// Open a new session
pub async fn create(
    store: &dyn Store,
    round: u32,
    immune_player_ids: Vec<String>,
) -> Result<VotingSession> {
    let session = VotingSession {
        id: Uuid::new_v4(),
        round,
        immune_player_ids,
        status: SessionStatus::Open,
        created_at: time::now(),
        closed_at: None,
    };
    store
        .set(
            collections::VOTE_SESSIONS,
            &session.id.to_string(),
            to_document(&session)?,
        )
        .await?;
    Ok(session)
}

/// Fetch one session
pub async fn get(store: &dyn Store, id: Uuid) -> Result<VotingSession> {
    match store
        .get(collections::VOTE_SESSIONS, &id.to_string())
        .await?
    {
        Some(doc) => from_document(doc),
        None => Err(Error::NotFound(format!("unknown session: {}", id))),
    }
}

/// Cast or replace a ballot in an open session
///
/// Immune players cannot be ballot targets here; that is enforced at cast
/// time, unlike the round-1 ballots which only filter at nomination time.
pub async fn cast_vote(
    store: &dyn Store,
    session_id: Uuid,
    voter: &str,
    candidate: &str,
) -> Result<Vote> {
    let session = get(store, session_id).await?;
    if !session.is_open() {
        return Err(Error::Conflict(format!(
            "session {} is closed",
            session_id
        )));
    }
    if session.immune_player_ids.iter().any(|p| p == candidate) {
        return Err(Error::InvalidInput(format!(
            "{} is immune and cannot be voted for in this session",
            candidate
        )));
    }
    let vote = Vote {
        voter: voter.to_string(),
        candidate: candidate.to_string(),
        cast_at: time::now(),
    };
    store
        .set(
            collections::SESSION_VOTES,
            &vote_key(session_id, voter),
            to_document(&vote)?,
        )
        .await?;
    Ok(vote)
}

/// Close a session; closing again is a no-op that leaves `closed_at` as set
/// by the first close
pub async fn close(store: &dyn Store, id: Uuid) -> Result<VotingSession> {
    let session = get(store, id).await?;
    if !session.is_open() {
        return Ok(session);
    }
    let patch = json!({
        "status": SessionStatus::Closed,
        "closedAt": time::now(),
    });
    let doc = store
        .merge(collections::VOTE_SESSIONS, &id.to_string(), to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Aggregate current ballots: provisional while open, final once closed
pub async fn tally(store: &dyn Store, id: Uuid) -> Result<SessionTally> {
    get(store, id).await?;
    let votes: Vec<Vote> = store
        .query_prefix(collections::SESSION_VOTES, &vote_prefix(id))
        .await?
        .into_iter()
        .map(|(_, doc)| from_document(doc))
        .collect::<Result<_>>()?;
    Ok(outcome::tally_votes(&votes))
}

/// Sessions, optionally filtered by round, most recent first
pub async fn list(store: &dyn Store, round: Option<u32>) -> Result<Vec<VotingSession>> {
    let mut sessions: Vec<VotingSession> = store
        .list(collections::VOTE_SESSIONS)
        .await?
        .into_iter()
        .map(|(_, doc)| from_document(doc))
        .collect::<Result<_>>()?;
    if let Some(round) = round {
        sessions.retain(|s| s.round == round);
    }
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
}
