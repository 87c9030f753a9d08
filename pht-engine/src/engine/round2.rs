//! Round-2 money ledger

use uuid::Uuid;

use pht_common::store::{from_document, to_document};
use pht_common::{time, Result, Store};

use crate::engine::{collections, registry};
use crate::models::MoneyEntry;

/// Append a scored run to the ledger
pub async fn record_entry(
    store: &dyn Store,
    player: &str,
    money: i64,
    map: Option<String>,
    notes: Option<String>,
) -> Result<MoneyEntry> {
    registry::require(store, player).await?;
    let entry = MoneyEntry {
        id: Uuid::new_v4(),
        player: player.to_string(),
        money,
        map,
        notes,
        recorded_at: time::now(),
    };
    store
        .set(
            collections::ROUND2_ENTRIES,
            &entry.id.to_string(),
            to_document(&entry)?,
        )
        .await?;
    Ok(entry)
}

/// Every ledger entry, money descending; earlier submissions rank above
/// later ones holding the same total
pub async fn scoreboard(store: &dyn Store) -> Result<Vec<MoneyEntry>> {
    let mut entries: Vec<MoneyEntry> = store
        .list(collections::ROUND2_ENTRIES)
        .await?
        .into_iter()
        .map(|(_, doc)| from_document(doc))
        .collect::<Result<_>>()?;
    entries.sort_by(|a, b| {
        b.money
            .cmp(&a.money)
            .then(a.recorded_at.cmp(&b.recorded_at))
            .then(a.id.cmp(&b.id))
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pht_common::store::MemoryStore;
    use pht_common::Store;

    async fn put(store: &dyn Store, money: i64, offset_secs: i64) -> Uuid {
        let entry = MoneyEntry {
            id: Uuid::new_v4(),
            player: "p".to_string(),
            money,
            map: None,
            notes: None,
            recorded_at: Utc::now() + Duration::seconds(offset_secs),
        };
        store
            .set(
                collections::ROUND2_ENTRIES,
                &entry.id.to_string(),
                to_document(&entry).unwrap(),
            )
            .await
            .unwrap();
        entry.id
    }

    #[tokio::test]
    async fn test_scoreboard_orders_money_desc_then_recorded_asc() {
        let store = MemoryStore::new();
        let low = put(&store, 100, 0).await;
        let high_late = put(&store, 300, 10).await;
        let high_early = put(&store, 300, 5).await;

        let board = scoreboard(&store).await.unwrap();
        let ids: Vec<Uuid> = board.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![high_early, high_late, low]);
    }

    #[tokio::test]
    async fn test_scoreboard_empty() {
        let store = MemoryStore::new();
        assert!(scoreboard(&store).await.unwrap().is_empty());
    }
}
