//! pht-engine library: tournament round & voting engine
//!
//! Validates submitted facts (draws, runs, ballots, money totals) at the
//! HTTP boundary, persists normalized state through the shared document
//! store, and derives authoritative round decisions (immunity, nomination,
//! teams, eliminations) from fresh reads on demand.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pht_common::auth::AuthTokens;
use pht_common::Store;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store holding all authoritative tournament state
    pub store: Arc<dyn Store>,
    /// Token configuration for caller-role resolution
    pub tokens: AuthTokens,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: AuthTokens) -> Self {
        Self { store, tokens }
    }
}

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Player registry
        .route(
            "/api/players",
            post(api::players::register).get(api::players::list),
        )
        .route("/api/players/:name", get(api::players::get))
        // Round 1: wildcard draw, qualifying runs, nomination ballots
        .route("/api/round1/choices", post(api::round1::draw_choices))
        .route("/api/round1/choices/:player", get(api::round1::get_choices))
        .route("/api/round1/wildcard", post(api::round1::select_wildcard))
        .route("/api/round1/run", post(api::round1::record_run))
        .route("/api/round1/vote", post(api::round1::cast_vote))
        .route("/api/round1/state", get(api::round1::get_states))
        .route("/api/round1/immunity", post(api::round1::compute_immunity))
        .route("/api/round1/outcome", post(api::round1::compute_outcome))
        // Round 2: money ledger
        .route("/api/round2/entries", post(api::round2::record_entry))
        .route("/api/round2/scoreboard", get(api::round2::scoreboard))
        // Round 3: partner ballots, teams, eliminations
        .route("/api/round3/vote", post(api::round3::cast_partner_vote))
        .route("/api/round3/votes", get(api::round3::list_partner_votes))
        .route(
            "/api/round3/teams",
            post(api::round3::set_teams).get(api::round3::get_teams),
        )
        .route("/api/round3/teams/run", post(api::round3::submit_team_run))
        .route("/api/round3/immunity", post(api::round3::set_immunity))
        .route("/api/round3/finalize", post(api::round3::finalize))
        .route(
            "/api/round3/elimination",
            post(api::round3::start_elimination).get(api::round3::get_elimination),
        )
        .route(
            "/api/round3/elimination/run",
            post(api::round3::submit_elimination_run),
        )
        .route(
            "/api/round3/elimination/resolve",
            post(api::round3::resolve_elimination),
        )
        // Voting sessions
        .route(
            "/api/sessions",
            post(api::sessions::create).get(api::sessions::list),
        )
        .route("/api/sessions/:id", get(api::sessions::get))
        .route("/api/sessions/:id/votes", post(api::sessions::cast_vote))
        .route("/api/sessions/:id/close", post(api::sessions::close))
        .route("/api/sessions/:id/tally", get(api::sessions::tally))
        // Health and build identification
        .merge(api::health::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
