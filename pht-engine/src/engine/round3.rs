//! Round-3 partner voting and team formation

use std::collections::BTreeSet;

use serde_json::json;

use pht_common::store::{from_document, to_document};
use pht_common::{time, Error, Result, Store};

use crate::engine::{collections, registry, ROUND3_PLAYER_COUNT};
use crate::models::{AssignmentMeta, PlayerRoundState, Team, TeamAssignment};

/// Canonical member order for a pair (name-sorted)
pub fn canonical_pair(a: &str, b: &str) -> [String; 2] {
    if a <= b {
        [a.to_string(), b.to_string()]
    } else {
        [b.to_string(), a.to_string()]
    }
}

/// Stable team identity: canonical members joined with '+'
pub fn team_key(members: &[String; 2]) -> String {
    format!("{}+{}", members[0], members[1])
}

/// Every player's round-3 state, keyed by name
pub async fn load_states(store: &dyn Store) -> Result<Vec<(String, PlayerRoundState)>> {
    store
        .list(collections::ROUND3_STATE)
        .await?
        .into_iter()
        .map(|(name, doc)| Ok((name, from_document(doc)?)))
        .collect()
}

/// Record a partner preference; re-casting replaces the previous one
///
/// Whether a player may vote for themselves is a boundary rule; this layer
/// records whatever voter and partner it is handed.
pub async fn record_partner_vote(
    store: &dyn Store,
    voter: &str,
    partner: &str,
) -> Result<PlayerRoundState> {
    registry::require(store, voter).await?;
    registry::require(store, partner).await?;
    let patch = json!({ "votedFor": partner });
    let doc = store
        .merge(collections::ROUND3_STATE, voter, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Admin-awarded round-3 immunity (judged, not elected)
pub async fn set_immunity(
    store: &dyn Store,
    player: &str,
    immune: bool,
) -> Result<PlayerRoundState> {
    registry::require(store, player).await?;
    let patch = json!({ "immune": immune });
    let doc = store
        .merge(collections::ROUND3_STATE, player, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Replace the team assignment
///
/// Validates pair structure, rejects any player appearing twice or a
/// leftover that is also paired, canonicalizes member order, and deletes
/// documents from a previous assignment that fell out of the set. A pair
/// that survives re-assignment keeps its submitted run result.
pub async fn set_teams(
    store: &dyn Store,
    pairs: &[[String; 2]],
    leftover: Option<String>,
) -> Result<TeamAssignment> {
    let mut seen = BTreeSet::new();
    for pair in pairs {
        if pair[0] == pair[1] {
            return Err(Error::InvalidInput(format!(
                "team pairs {} with themselves",
                pair[0]
            )));
        }
        for name in pair {
            if !seen.insert(name.clone()) {
                return Err(Error::Conflict(format!(
                    "player {} appears in more than one team",
                    name
                )));
            }
        }
    }
    if let Some(name) = &leftover {
        if seen.contains(name) {
            return Err(Error::Conflict(format!(
                "leftover player {} also appears in a team",
                name
            )));
        }
    }
    for name in seen.iter().chain(leftover.iter()) {
        registry::require(store, name).await?;
    }

    let proposed: Vec<Team> = pairs
        .iter()
        .map(|pair| Team {
            members: canonical_pair(&pair[0], &pair[1]),
            money: None,
            map: None,
            submitted_at: None,
        })
        .collect();

    // drop teams from a previous assignment that are not in the new set
    let keep: BTreeSet<String> = proposed.iter().map(|t| team_key(&t.members)).collect();
    for (key, _) in store.list(collections::ROUND3_TEAMS).await? {
        if !keep.contains(&key) {
            store.delete(collections::ROUND3_TEAMS, &key).await?;
        }
    }

    let mut teams = Vec::with_capacity(proposed.len());
    for team in proposed {
        let key = team_key(&team.members);
        let team = match store.get(collections::ROUND3_TEAMS, &key).await? {
            Some(doc) => from_document(doc)?,
            None => team,
        };
        store
            .set(collections::ROUND3_TEAMS, &key, to_document(&team)?)
            .await?;
        teams.push(team);
    }

    let meta = AssignmentMeta {
        leftover: leftover.clone(),
        set_at: time::now(),
    };
    store
        .set(collections::ROUND3_META, "assignment", to_document(&meta)?)
        .await?;

    teams.sort_by_key(|t| team_key(&t.members));
    Ok(TeamAssignment { teams, leftover })
}

/// Current assignment (teams plus leftover), key-ordered
pub async fn get_assignment(store: &dyn Store) -> Result<TeamAssignment> {
    let teams: Vec<Team> = store
        .list(collections::ROUND3_TEAMS)
        .await?
        .into_iter()
        .map(|(_, doc)| from_document(doc))
        .collect::<Result<_>>()?;
    let leftover = store
        .get(collections::ROUND3_META, "assignment")
        .await?
        .map(from_document::<AssignmentMeta>)
        .transpose()?
        .and_then(|meta| meta.leftover);
    Ok(TeamAssignment { teams, leftover })
}

/// Attach a money result to a team; re-submission replaces it
pub async fn submit_team_run(
    store: &dyn Store,
    a: &str,
    b: &str,
    money: i64,
    map: Option<String>,
) -> Result<Team> {
    let key = team_key(&canonical_pair(a, b));
    if store.get(collections::ROUND3_TEAMS, &key).await?.is_none() {
        return Err(Error::NotFound(format!("no such team: {}", key)));
    }
    let patch = json!({
        "money": money,
        "map": map,
        "submittedAt": time::now(),
    });
    let doc = store
        .merge(collections::ROUND3_TEAMS, &key, to_document(&patch)?)
        .await?;
    from_document(doc)
}

/// Validation gate for round-3 entry
///
/// Exactly the expected number of survivors, and the stored assignment must
/// pair every one of them except the single designated leftover.
pub async fn finalize(store: &dyn Store, players: &[String]) -> Result<TeamAssignment> {
    if players.len() != ROUND3_PLAYER_COUNT {
        return Err(Error::InvalidInput(format!(
            "round 3 requires exactly {} players, got {}",
            ROUND3_PLAYER_COUNT,
            players.len()
        )));
    }
    let roster: BTreeSet<&str> = players.iter().map(String::as_str).collect();
    if roster.len() != players.len() {
        return Err(Error::InvalidInput(
            "surviving roster lists a player twice".to_string(),
        ));
    }

    let assignment = get_assignment(store).await?;
    let mut covered: BTreeSet<&str> = BTreeSet::new();
    for team in &assignment.teams {
        for name in &team.members {
            covered.insert(name.as_str());
        }
    }
    match &assignment.leftover {
        Some(name) => {
            covered.insert(name.as_str());
        }
        None => {
            return Err(Error::Conflict(
                "an odd roster needs a designated leftover".to_string(),
            ))
        }
    }

    if covered != roster {
        return Err(Error::Conflict(
            "team assignment does not cover the surviving roster".to_string(),
        ));
    }
    Ok(assignment)
}
