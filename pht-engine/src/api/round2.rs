//! Round-2 money ledger endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::{required, valid_money, Caller};
use crate::engine::round2;
use crate::error::ApiResult;
use crate::models::MoneyEntry;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub player: String,
    pub money: i64,
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /api/round2/entries
pub async fn record_entry(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<EntryRequest>,
) -> ApiResult<Json<MoneyEntry>> {
    caller.require_user()?;
    let player = required(&req.player, "player")?;
    let money = valid_money(req.money)?;
    Ok(Json(
        round2::record_entry(state.store.as_ref(), player, money, req.map, req.notes).await?,
    ))
}

/// GET /api/round2/scoreboard
pub async fn scoreboard(State(state): State<AppState>) -> ApiResult<Json<Vec<MoneyEntry>>> {
    Ok(Json(round2::scoreboard(state.store.as_ref()).await?))
}
