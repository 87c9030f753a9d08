//! Pure decision functions
//!
//! Everything here is deterministic and order-independent: inputs are sorted
//! internally, never trusted to arrive sorted. Ties that would require a
//! judgment call are reported, not broken.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::ROUND1_IMMUNITY_SLOTS;
use crate::models::{ImmunityMark, PlayerRoundState, SessionTally, Vote, VotingOutcome};

/// Rank round-1 qualifying runs and mark the top performers immune
///
/// Ranking is marks descending, then lower run time. Equal (marks, time)
/// pairs fall back to name order so the cutoff is a pure function of the
/// input set. Players without a recorded run are never immune.
pub fn compute_immunity(states: &[(String, PlayerRoundState)]) -> Vec<ImmunityMark> {
    let mut ranked: Vec<(&str, u32, u64)> = states
        .iter()
        .filter_map(|(name, state)| {
            state
                .marks
                .map(|marks| (name.as_str(), marks, state.run_time_ms.unwrap_or(u64::MAX)))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.0.cmp(b.0)));

    let immune: BTreeSet<&str> = ranked
        .iter()
        .take(ROUND1_IMMUNITY_SLOTS)
        .map(|(name, _, _)| *name)
        .collect();

    let mut marks: Vec<ImmunityMark> = states
        .iter()
        .map(|(name, _)| ImmunityMark {
            name: name.clone(),
            immune: immune.contains(name.as_str()),
        })
        .collect();
    marks.sort_by(|a, b| a.name.cmp(&b.name));
    marks
}

/// Tally round-1 nomination ballots and pick the nominee
///
/// The tally counts every ballot, including those cast for immune players;
/// the nomination itself only ever lands on a non-immune candidate holding a
/// strict plurality. Tied leaders mean no nominee.
pub fn compute_voting_outcome(states: &[(String, PlayerRoundState)]) -> VotingOutcome {
    let immune: BTreeSet<&str> = states
        .iter()
        .filter(|(_, state)| state.immune)
        .map(|(name, _)| name.as_str())
        .collect();

    let mut tally: BTreeMap<String, u32> = BTreeMap::new();
    for (_, state) in states {
        if let Some(candidate) = &state.voted_for {
            *tally.entry(candidate.clone()).or_insert(0) += 1;
        }
    }

    let top = tally
        .iter()
        .filter(|(candidate, _)| !immune.contains(candidate.as_str()))
        .map(|(_, count)| *count)
        .max();

    let nominated = top.and_then(|top| {
        let mut leaders = tally
            .iter()
            .filter(|(candidate, count)| **count == top && !immune.contains(candidate.as_str()));
        match (leaders.next(), leaders.next()) {
            (Some((name, _)), None) => Some(name.clone()),
            _ => None,
        }
    });

    VotingOutcome { nominated, tally }
}

/// Count a ballot set and report every leading candidate
pub fn tally_votes(votes: &[Vote]) -> SessionTally {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for vote in votes {
        *counts.entry(vote.candidate.clone()).or_insert(0) += 1;
    }

    let leaders = match counts.values().copied().max() {
        Some(top) => counts
            .iter()
            .filter(|(_, count)| **count == top)
            .map(|(candidate, _)| candidate.clone())
            .collect(),
        None => Vec::new(),
    };

    SessionTally { counts, leaders }
}
