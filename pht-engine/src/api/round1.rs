//! Round-1 endpoints: wildcard draw, qualifying runs, ballots, outcomes

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{required, Caller};
use crate::engine::{draw, round1};
use crate::error::{ApiError, ApiResult};
use crate::models::{ChoiceDraw, ImmunityMark, PlayerRoundState, VotingOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub player: String,
}

/// POST /api/round1/choices
///
/// Idempotent: the first call deals and stores the draw, every later call
/// returns the stored one.
pub async fn draw_choices(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<DrawRequest>,
) -> ApiResult<Json<ChoiceDraw>> {
    caller.require_user()?;
    let player = required(&req.player, "player")?;
    Ok(Json(
        draw::draw_choices(state.store.as_ref(), player).await?,
    ))
}

/// GET /api/round1/choices/:player
pub async fn get_choices(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> ApiResult<Json<ChoiceDraw>> {
    match draw::get_draw(state.store.as_ref(), &player).await? {
        Some(draw) => Ok(Json(draw)),
        None => Err(ApiError::NotFound(format!(
            "no wildcard draw for player: {}",
            player
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildcardRequest {
    pub player: String,
    pub choice_id: String,
}

/// POST /api/round1/wildcard
pub async fn select_wildcard(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<WildcardRequest>,
) -> ApiResult<Json<PlayerRoundState>> {
    caller.require_user()?;
    let player = required(&req.player, "player")?;
    let choice_id = required(&req.choice_id, "choiceId")?;
    Ok(Json(
        round1::select_wildcard(state.store.as_ref(), player, choice_id).await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub player: String,
    pub marks: i64,
    pub run_time_ms: i64,
}

/// POST /api/round1/run
pub async fn record_run(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<RunRequest>,
) -> ApiResult<Json<PlayerRoundState>> {
    caller.require_user()?;
    let player = required(&req.player, "player")?;
    if req.marks < 0 || req.marks > u32::MAX as i64 {
        return Err(ApiError::Validation("marks out of range".to_string()));
    }
    if req.run_time_ms <= 0 {
        return Err(ApiError::Validation(
            "runTimeMs must be positive".to_string(),
        ));
    }
    Ok(Json(
        round1::record_run(
            state.store.as_ref(),
            player,
            req.marks as u32,
            req.run_time_ms as u64,
        )
        .await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter: String,
    pub candidate: String,
}

/// POST /api/round1/vote
pub async fn cast_vote(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<PlayerRoundState>> {
    caller.require_user()?;
    let voter = required(&req.voter, "voter")?;
    let candidate = required(&req.candidate, "candidate")?;
    Ok(Json(
        round1::cast_vote(state.store.as_ref(), voter, candidate).await?,
    ))
}

/// GET /api/round1/state
pub async fn get_states(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, PlayerRoundState>>> {
    let states = round1::load_states(state.store.as_ref()).await?;
    Ok(Json(states.into_iter().collect()))
}

/// POST /api/round1/immunity
///
/// Recomputes immunity from the current runs and persists the flags.
pub async fn compute_immunity(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<ImmunityMark>>> {
    caller.require_admin()?;
    Ok(Json(round1::apply_immunity(state.store.as_ref()).await?))
}

/// POST /api/round1/outcome
///
/// Recomputes the nomination from the current ballots and persists the
/// flags. A tie comes back with no nominee and the full tally.
pub async fn compute_outcome(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<VotingOutcome>> {
    caller.require_admin()?;
    Ok(Json(
        round1::apply_voting_outcome(state.store.as_ref()).await?,
    ))
}
