//! Voting session endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{required, Caller};
use crate::engine::sessions;
use crate::error::{ApiError, ApiResult};
use crate::models::{SessionTally, Vote, VotingSession};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub round: i64,
    #[serde(default)]
    pub immune_player_ids: Vec<String>,
}

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<Json<VotingSession>> {
    caller.require_admin()?;
    if req.round < 1 || req.round > u32::MAX as i64 {
        return Err(ApiError::Validation(
            "round must be a positive round number".to_string(),
        ));
    }
    for id in &req.immune_player_ids {
        required(id, "immunePlayerIds")?;
    }
    Ok(Json(
        sessions::create(
            state.store.as_ref(),
            req.round as u32,
            req.immune_player_ids,
        )
        .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub round: Option<u32>,
}

/// GET /api/sessions?round=N
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<VotingSession>>> {
    Ok(Json(
        sessions::list(state.store.as_ref(), query.round).await?,
    ))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VotingSession>> {
    Ok(Json(sessions::get(state.store.as_ref(), id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionVoteRequest {
    pub voter: String,
    pub candidate: String,
}

/// POST /api/sessions/:id/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<SessionVoteRequest>,
) -> ApiResult<Json<Vote>> {
    caller.require_user()?;
    let voter = required(&req.voter, "voter")?;
    let candidate = required(&req.candidate, "candidate")?;
    Ok(Json(
        sessions::cast_vote(state.store.as_ref(), id, voter, candidate).await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub ok: bool,
    pub session: VotingSession,
}

/// POST /api/sessions/:id/close
///
/// Idempotent: closing a closed session succeeds without touching it.
pub async fn close(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CloseResponse>> {
    caller.require_admin()?;
    let session = sessions::close(state.store.as_ref(), id).await?;
    Ok(Json(CloseResponse { ok: true, session }))
}

/// GET /api/sessions/:id/tally
pub async fn tally(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionTally>> {
    Ok(Json(sessions::tally(state.store.as_ref(), id).await?))
}
