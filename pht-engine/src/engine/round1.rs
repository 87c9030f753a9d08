//! Round-1 writers and outcome application
//!
//! Qualifying runs, wildcard commitments and nomination ballots land as
//! targeted merges on per-player state documents. The immunity and
//! nomination steps recompute from a fresh read and write back only the
//! flags they own, leaving concurrent ballot edits untouched.

use futures::future::join_all;
use serde_json::json;

use pht_common::store::{from_document, to_document};
use pht_common::{Error, Result, Store};

use crate::engine::{collections, draw, outcome, registry};
use crate::models::{ImmunityMark, PlayerRoundState, VotingOutcome};

/// Every player's round-1 state, keyed by name
pub async fn load_states(store: &dyn Store) -> Result<Vec<(String, PlayerRoundState)>> {
    store
        .list(collections::ROUND1_STATE)
        .await?
        .into_iter()
        .map(|(name, doc)| Ok((name, from_document(doc)?)))
        .collect()
}

/// Merge qualifying-run metrics into a player's state
///
/// Only the most recent attempt counts; resubmission replaces both metrics.
pub async fn record_run(
    store: &dyn Store,
    player: &str,
    marks: u32,
    run_time_ms: u64,
) -> Result<PlayerRoundState> {
    registry::require(store, player).await?;
    let patch = json!({
        "marks": marks,
        "runTimeMs": run_time_ms,
    });
    let doc = store
        .merge(collections::ROUND1_STATE, player, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Commit one of the player's drawn wildcards
pub async fn select_wildcard(
    store: &dyn Store,
    player: &str,
    choice_id: &str,
) -> Result<PlayerRoundState> {
    let draw = match draw::get_draw(store, player).await? {
        Some(draw) => draw,
        None => {
            return Err(Error::NotFound(format!(
                "no wildcard draw for player: {}",
                player
            )))
        }
    };
    if !draw.choices.iter().any(|choice| choice.id == choice_id) {
        return Err(Error::InvalidInput(format!(
            "choice {} is not in {}'s draw",
            choice_id, player
        )));
    }
    let patch = json!({ "selectedWildcard": choice_id });
    let doc = store
        .merge(collections::ROUND1_STATE, player, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Record a nomination ballot; re-casting replaces the previous one
///
/// Ballots naming immune candidates are accepted: they show in the tally but
/// can never produce the nomination.
pub async fn cast_vote(
    store: &dyn Store,
    voter: &str,
    candidate: &str,
) -> Result<PlayerRoundState> {
    registry::require(store, voter).await?;
    registry::require(store, candidate).await?;
    let patch = json!({ "votedFor": candidate });
    let doc = store
        .merge(collections::ROUND1_STATE, voter, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Recompute immunity from current runs and write back only the flag
///
/// Writes fan out concurrently; a partial failure surfaces as an error and
/// is safe to retry because every write is a pure function of the same read.
pub async fn apply_immunity(store: &dyn Store) -> Result<Vec<ImmunityMark>> {
    let states = load_states(store).await?;
    let marks = outcome::compute_immunity(&states);

    let writes = marks.iter().map(|mark| {
        let patch = json!({ "immune": mark.immune });
        async move {
            store
                .merge(collections::ROUND1_STATE, &mark.name, to_document(&patch)?)
                .await?;
            Ok::<(), Error>(())
        }
    });
    for result in join_all(writes).await {
        result?;
    }
    Ok(marks)
}

/// Recompute the nomination outcome and write back only the flag
pub async fn apply_voting_outcome(store: &dyn Store) -> Result<VotingOutcome> {
    let states = load_states(store).await?;
    let decision = outcome::compute_voting_outcome(&states);

    let writes = states.iter().map(|(name, _)| {
        let nominated = decision.nominated.as_deref() == Some(name.as_str());
        let patch = json!({ "nominated": nominated });
        async move {
            store
                .merge(collections::ROUND1_STATE, name, to_document(&patch)?)
                .await?;
            Ok::<(), Error>(())
        }
    });
    for result in join_all(writes).await {
        result?;
    }
    Ok(decision)
}
