//! Player registry

use pht_common::store::{from_document, to_document};
use pht_common::{Error, Result, Store};

use crate::engine::collections;
use crate::models::Player;

/// Create a player document; the preferred name is the key and must be unused
pub async fn register(store: &dyn Store, player: Player) -> Result<Player> {
    let name = player.preferred_name.clone();
    if store.get(collections::PLAYERS, &name).await?.is_some() {
        return Err(Error::Conflict(format!(
            "player already registered: {}",
            name
        )));
    }
    store
        .set(collections::PLAYERS, &name, to_document(&player)?)
        .await?;
    Ok(player)
}

/// Fetch one player
pub async fn get(store: &dyn Store, name: &str) -> Result<Player> {
    match store.get(collections::PLAYERS, name).await? {
        Some(doc) => from_document(doc),
        None => Err(Error::NotFound(format!("unknown player: {}", name))),
    }
}

/// Error unless the player is registered
pub async fn require(store: &dyn Store, name: &str) -> Result<()> {
    if store.get(collections::PLAYERS, name).await?.is_some() {
        Ok(())
    } else {
        Err(Error::NotFound(format!("unknown player: {}", name)))
    }
}

/// The full roster, name-ordered
pub async fn list(store: &dyn Store) -> Result<Vec<Player>> {
    store
        .list(collections::PLAYERS)
        .await?
        .into_iter()
        .map(|(_, doc)| from_document(doc))
        .collect()
}
