//! Round-1 wildcard draw
//!
//! Each player is dealt a fixed-size subset of the global pool at most once.
//! Two concurrent first calls can race; the draw that commits last wins and
//! both callers see a stored draw afterwards, so no locking is needed.

use rand::seq::index;
use rand::Rng;

use pht_common::store::{from_document, to_document};
use pht_common::{time, Result, Store};

use crate::engine::{collections, registry, WILDCARD_DRAW_SIZE};
use crate::models::{ChoiceDraw, WildcardChoice};

/// The global wildcard pool
///
/// Ids are stable; labels and descriptions are what the site renders.
const WILDCARD_POOL: &[(&str, &str, &str)] = &[
    (
        "no-flashlight",
        "No Flashlight",
        "Complete the contract without any flashlight.",
    ),
    (
        "lights-out",
        "Lights Out",
        "The breaker stays off for the whole contract.",
    ),
    (
        "no-sanity-meds",
        "No Sanity Meds",
        "Sanity medication stays in the van.",
    ),
    (
        "solo-run",
        "Solo Run",
        "No teammates in the building at any point.",
    ),
    (
        "no-hiding",
        "No Hiding",
        "Hiding spots and closets are off limits during hunts.",
    ),
    (
        "no-sprint",
        "No Sprint",
        "Walking pace only, even mid-hunt.",
    ),
    (
        "zero-evidence",
        "Zero Evidence",
        "Identify the ghost without collecting any evidence.",
    ),
    (
        "photo-only",
        "Photo Income Only",
        "Only photo rewards count toward money.",
    ),
    (
        "no-smudge",
        "No Smudge Sticks",
        "Smudge sticks may not be brought or used.",
    ),
    (
        "marathon",
        "Marathon",
        "The run must clear every optional objective.",
    ),
    (
        "candle-light",
        "Candle Light",
        "Candles are the only personal light source.",
    ),
    (
        "open-door-policy",
        "Open Door Policy",
        "Every door touched must be left open.",
    ),
];

/// Deal a random subset of the pool, without replacement
fn sample_pool<R: Rng>(rng: &mut R) -> Vec<WildcardChoice> {
    index::sample(rng, WILDCARD_POOL.len(), WILDCARD_DRAW_SIZE)
        .into_iter()
        .map(|i| {
            let (id, label, description) = WILDCARD_POOL[i];
            WildcardChoice {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
            }
        })
        .collect()
}

/// Return the stored draw for `player`, dealing and persisting one first if
/// none exists yet
pub async fn draw_choices(store: &dyn Store, player: &str) -> Result<ChoiceDraw> {
    registry::require(store, player).await?;

    if let Some(doc) = store.get(collections::ROUND1_CHOICES, player).await? {
        return from_document(doc);
    }

    let draw = ChoiceDraw {
        player: player.to_string(),
        choices: sample_pool(&mut rand::thread_rng()),
        drawn_at: time::now(),
    };

    // Re-check right before the write: if another caller committed a draw in
    // the window above, keep theirs.
    if let Some(doc) = store.get(collections::ROUND1_CHOICES, player).await? {
        return from_document(doc);
    }
    store
        .set(collections::ROUND1_CHOICES, player, to_document(&draw)?)
        .await?;
    Ok(draw)
}

/// The stored draw, if any
pub async fn get_draw(store: &dyn Store, player: &str) -> Result<Option<ChoiceDraw>> {
    store
        .get(collections::ROUND1_CHOICES, player)
        .await?
        .map(from_document)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_pool_ids_are_unique() {
        let ids: BTreeSet<&str> = WILDCARD_POOL.iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids.len(), WILDCARD_POOL.len());
    }

    #[test]
    fn test_pool_is_large_enough_for_a_draw() {
        assert!(WILDCARD_POOL.len() >= WILDCARD_DRAW_SIZE);
    }

    #[test]
    fn test_sample_has_right_size_and_no_repeats() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let drawn = sample_pool(&mut rng);
            assert_eq!(drawn.len(), WILDCARD_DRAW_SIZE);
            let ids: BTreeSet<&str> = drawn.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids.len(), WILDCARD_DRAW_SIZE);
        }
    }
}
