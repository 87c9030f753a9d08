//! Round-3 endpoints: partner ballots, teams, judged immunity, eliminations

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{required, valid_money, Caller};
use crate::engine::{elimination, round3};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    EliminationMatch, EliminationOutcome, PlayerRoundState, Team, TeamAssignment,
};
use crate::AppState;

/// Pull a validated two-member pair out of a request list
fn member_pair(members: &[String]) -> Result<(&str, &str), ApiError> {
    match members {
        [a, b] => {
            let a = required(a, "members")?;
            let b = required(b, "members")?;
            if a == b {
                return Err(ApiError::Validation(
                    "a pair cannot name the same player twice".to_string(),
                ));
            }
            Ok((a, b))
        }
        _ => Err(ApiError::Validation(
            "members must name exactly two players".to_string(),
        )),
    }
}

// ============================================================================
// Partner voting
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerVoteRequest {
    pub voter: String,
    pub partner: String,
}

/// POST /api/round3/vote
pub async fn cast_partner_vote(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<PartnerVoteRequest>,
) -> ApiResult<Json<PlayerRoundState>> {
    caller.require_user()?;
    let voter = required(&req.voter, "voter")?;
    let partner = required(&req.partner, "partner")?;
    if voter == partner {
        return Err(ApiError::Validation(
            "players cannot vote to partner with themselves".to_string(),
        ));
    }
    Ok(Json(
        round3::record_partner_vote(state.store.as_ref(), voter, partner).await?,
    ))
}

/// GET /api/round3/votes
///
/// Current partner preferences as voter -> partner.
pub async fn list_partner_votes(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let states = round3::load_states(state.store.as_ref()).await?;
    let votes = states
        .into_iter()
        .filter_map(|(name, s)| s.voted_for.map(|partner| (name, partner)))
        .collect();
    Ok(Json(votes))
}

// ============================================================================
// Teams
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsRequest {
    pub teams: Vec<Vec<String>>,
    #[serde(default)]
    pub leftover: Option<String>,
}

/// POST /api/round3/teams
pub async fn set_teams(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<TeamsRequest>,
) -> ApiResult<Json<TeamAssignment>> {
    caller.require_admin()?;
    let mut pairs = Vec::with_capacity(req.teams.len());
    for team in &req.teams {
        let (a, b) = member_pair(team)?;
        pairs.push([a.to_string(), b.to_string()]);
    }
    let leftover = match req.leftover {
        Some(name) => Some(required(&name, "leftover")?.to_string()),
        None => None,
    };
    Ok(Json(
        round3::set_teams(state.store.as_ref(), &pairs, leftover).await?,
    ))
}

/// GET /api/round3/teams
pub async fn get_teams(State(state): State<AppState>) -> ApiResult<Json<TeamAssignment>> {
    Ok(Json(round3::get_assignment(state.store.as_ref()).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRunRequest {
    pub members: Vec<String>,
    pub money: i64,
    #[serde(default)]
    pub map: Option<String>,
}

/// POST /api/round3/teams/run
pub async fn submit_team_run(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<TeamRunRequest>,
) -> ApiResult<Json<Team>> {
    caller.require_user()?;
    let (a, b) = member_pair(&req.members)?;
    let money = valid_money(req.money)?;
    Ok(Json(
        round3::submit_team_run(state.store.as_ref(), a, b, money, req.map).await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunityRequest {
    pub player: String,
    pub immune: bool,
}

/// POST /api/round3/immunity
pub async fn set_immunity(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<ImmunityRequest>,
) -> ApiResult<Json<PlayerRoundState>> {
    caller.require_admin()?;
    let player = required(&req.player, "player")?;
    Ok(Json(
        round3::set_immunity(state.store.as_ref(), player, req.immune).await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub players: Vec<String>,
}

/// POST /api/round3/finalize
///
/// Validates that the surviving roster matches the stored assignment.
pub async fn finalize(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<FinalizeRequest>,
) -> ApiResult<Json<TeamAssignment>> {
    caller.require_admin()?;
    for player in &req.players {
        required(player, "players")?;
    }
    Ok(Json(
        round3::finalize(state.store.as_ref(), &req.players).await?,
    ))
}

// ============================================================================
// Elimination matches
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub members: Vec<String>,
}

/// POST /api/round3/elimination
pub async fn start_elimination(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<MatchRequest>,
) -> ApiResult<Json<EliminationMatch>> {
    caller.require_admin()?;
    let (a, b) = member_pair(&req.members)?;
    Ok(Json(elimination::start(state.store.as_ref(), a, b).await?))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub a: String,
    pub b: String,
}

/// GET /api/round3/elimination?a=...&b=...
pub async fn get_elimination(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> ApiResult<Json<EliminationMatch>> {
    let a = required(&query.a, "a")?;
    let b = required(&query.b, "b")?;
    Ok(Json(elimination::get(state.store.as_ref(), a, b).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRunRequest {
    pub members: Vec<String>,
    pub player: String,
    pub money: i64,
}

/// POST /api/round3/elimination/run
pub async fn submit_elimination_run(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<MatchRunRequest>,
) -> ApiResult<Json<EliminationMatch>> {
    caller.require_user()?;
    let (a, b) = member_pair(&req.members)?;
    let player = required(&req.player, "player")?;
    let money = valid_money(req.money)?;
    Ok(Json(
        elimination::submit_run(state.store.as_ref(), a, b, player, money).await?,
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    #[serde(flatten)]
    pub outcome: EliminationOutcome,
    pub match_state: EliminationMatch,
}

/// POST /api/round3/elimination/resolve
///
/// A winner resolves the match; an exact tie is reported in the 200 body
/// and the match stays in progress.
pub async fn resolve_elimination(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<MatchRequest>,
) -> ApiResult<Json<ResolveResponse>> {
    caller.require_admin()?;
    let (a, b) = member_pair(&req.members)?;
    let (match_state, outcome) = elimination::resolve(state.store.as_ref(), a, b).await?;
    Ok(Json(ResolveResponse {
        outcome,
        match_state,
    }))
}
