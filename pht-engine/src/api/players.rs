//! Player registry endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use pht_common::time;

use crate::api::{required, Caller};
use crate::engine::registry;
use crate::error::{ApiError, ApiResult};
use crate::models::Player;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub preferred_name: String,
    #[serde(default)]
    pub twitch: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub phasmo_hours: f64,
    #[serde(default)]
    pub prestige_at_admission: u32,
    #[serde(default)]
    pub previous_tourney: bool,
}

/// POST /api/players
pub async fn register(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<Player>> {
    caller.require_user()?;
    let name = required(&req.preferred_name, "preferredName")?;
    if name != req.preferred_name.trim() {
        return Err(ApiError::Validation(
            "preferredName must not start or end with whitespace".to_string(),
        ));
    }
    let player = Player {
        preferred_name: req.preferred_name,
        twitch: req.twitch,
        discord: req.discord,
        phasmo_hours: req.phasmo_hours,
        prestige_at_admission: req.prestige_at_admission,
        previous_tourney: req.previous_tourney,
        registered_at: time::now(),
    };
    let player = registry::register(state.store.as_ref(), player).await?;
    Ok(Json(player))
}

/// GET /api/players
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(registry::list(state.store.as_ref()).await?))
}

/// GET /api/players/:name
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Player>> {
    Ok(Json(registry::get(state.store.as_ref(), &name).await?))
}
