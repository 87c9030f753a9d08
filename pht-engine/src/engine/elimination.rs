//! Head-to-head elimination matches
//!
//! Two members of an eliminated team race for money 1v1. The engine never
//! breaks an exact tie; it reports the tie and leaves the match in progress
//! for the admin to order a re-run.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::json;

use pht_common::store::{from_document, to_document};
use pht_common::{time, Error, Result, Store};

use crate::engine::round3::{canonical_pair, team_key};
use crate::engine::{collections, registry};
use crate::models::{EliminationMatch, EliminationOutcome, EliminationRun, MatchStatus};

async fn load(store: &dyn Store, key: &str) -> Result<EliminationMatch> {
    match store.get(collections::ROUND3_ELIMS, key).await? {
        Some(doc) => from_document(doc),
        None => Err(Error::NotFound(format!(
            "no elimination match for: {}",
            key
        ))),
    }
}

/// Open a pending match between two players
///
/// Refused while either player already sits in a match that has not
/// resolved, so nobody can be racing on two fronts at once.
pub async fn start(store: &dyn Store, a: &str, b: &str) -> Result<EliminationMatch> {
    if a == b {
        return Err(Error::InvalidInput(format!(
            "match pairs {} with themselves",
            a
        )));
    }
    registry::require(store, a).await?;
    registry::require(store, b).await?;

    for (_, doc) in store.list(collections::ROUND3_ELIMS).await? {
        let existing: EliminationMatch = from_document(doc)?;
        if existing.status.is_terminal() {
            continue;
        }
        for name in [a, b] {
            if existing.members.iter().any(|m| m == name) {
                return Err(Error::Conflict(format!(
                    "player {} already has an unresolved elimination match",
                    name
                )));
            }
        }
    }

    let members = canonical_pair(a, b);
    let key = team_key(&members);
    let matchup = EliminationMatch {
        members,
        status: MatchStatus::Pending,
        runs: BTreeMap::new(),
        winner: None,
        created_at: time::now(),
        resolved_at: None,
    };
    store
        .set(collections::ROUND3_ELIMS, &key, to_document(&matchup)?)
        .await?;
    Ok(matchup)
}

/// Fetch a match by its two members, in either order
pub async fn get(store: &dyn Store, a: &str, b: &str) -> Result<EliminationMatch> {
    load(store, &team_key(&canonical_pair(a, b))).await
}

/// Record one side's run; re-submission replaces that side's result
pub async fn submit_run(
    store: &dyn Store,
    a: &str,
    b: &str,
    player: &str,
    money: i64,
) -> Result<EliminationMatch> {
    let key = team_key(&canonical_pair(a, b));
    let matchup = load(store, &key).await?;

    if !matchup.members.iter().any(|m| m == player) {
        return Err(Error::InvalidInput(format!(
            "{} is not part of this match",
            player
        )));
    }
    if matchup.status.is_terminal() {
        return Err(Error::Conflict(
            "match is already resolved".to_string(),
        ));
    }

    let mut runs = matchup.runs;
    runs.insert(
        player.to_string(),
        EliminationRun {
            money,
            submitted_at: time::now(),
        },
    );
    let patch = json!({
        "runs": runs,
        "status": MatchStatus::InProgress,
    });
    let doc = store
        .merge(collections::ROUND3_ELIMS, &key, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Compare the two runs and settle the match
///
/// Strictly higher money wins. Resolving a resolved match re-reports its
/// recorded outcome without touching it. A tie writes nothing: the match
/// stays in progress and the tie travels back as a distinguished result.
pub async fn resolve(
    store: &dyn Store,
    a: &str,
    b: &str,
) -> Result<(EliminationMatch, EliminationOutcome)> {
    let key = team_key(&canonical_pair(a, b));
    let matchup = load(store, &key).await?;

    if let Some(winner) = matchup.winner.clone() {
        let loser = matchup
            .members
            .iter()
            .find(|m| **m != winner)
            .cloned()
            .unwrap_or_default();
        return Ok((matchup, EliminationOutcome::Winner { winner, loser }));
    }

    let (run_a, run_b) = match (
        matchup.runs.get(&matchup.members[0]),
        matchup.runs.get(&matchup.members[1]),
    ) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(Error::Conflict(
                "both players must submit a run before resolution".to_string(),
            ))
        }
    };

    let (winner, loser) = match run_a.money.cmp(&run_b.money) {
        Ordering::Greater => (matchup.members[0].clone(), matchup.members[1].clone()),
        Ordering::Less => (matchup.members[1].clone(), matchup.members[0].clone()),
        Ordering::Equal => {
            let money = run_a.money;
            return Ok((matchup, EliminationOutcome::Tie { money }));
        }
    };

    let patch = json!({
        "status": MatchStatus::Resolved,
        "winner": winner,
        "resolvedAt": time::now(),
    });
    let doc = store
        .merge(collections::ROUND3_ELIMS, &key, to_document(&patch)?)
        .await?;
    Ok((from_document(doc)?, EliminationOutcome::Winner { winner, loser }))
}
