//! Role-gating tests
//!
//! These run with both tokens configured, so the router enforces the full
//! anonymous / user / admin ladder: reads stay public, fact submission
//! needs the player token, authoritative mutations need the admin token.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use pht_common::auth::AuthTokens;
use pht_common::store::MemoryStore;
use pht_engine::{build_router, AppState};

const ADMIN_TOKEN: &str = "admin-secret";
const PLAYER_TOKEN: &str = "player-secret";

fn setup_tokened_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        AuthTokens::new(Some(ADMIN_TOKEN.into()), Some(PLAYER_TOKEN.into())),
    );
    build_router(state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("x-api-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request should complete");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read response body");
    let body = serde_json::from_slice(&bytes).expect("Response should be JSON");
    (status, body)
}

#[tokio::test]
async fn test_reads_stay_public() {
    let app = setup_tokened_app();

    let (status, _) = send(&app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request("/api/players")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request("/api/round2/scoreboard")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request("/api/round3/teams")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request("/api/sessions")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_ops_reject_anonymous_and_perform_no_writes() {
    let app = setup_tokened_app();

    let (status, body) = send(
        &app,
        post_json("/api/players", None, json!({ "preferredName": "ash" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    // nothing was written
    let (_, players) = send(&app, get_request("/api/players")).await;
    assert_eq!(players, json!([]));
}

#[tokio::test]
async fn test_player_token_allows_fact_submission() {
    let app = setup_tokened_app();

    let (status, _) = send(
        &app,
        post_json(
            "/api/players",
            Some(PLAYER_TOKEN),
            json!({ "preferredName": "ash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json(
            "/api/round1/choices",
            Some(PLAYER_TOKEN),
            json!({ "player": "ash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json(
            "/api/round1/run",
            Some(PLAYER_TOKEN),
            json!({ "player": "ash", "marks": 5, "runTimeMs": 1000 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_ops_reject_player_token() {
    let app = setup_tokened_app();

    let (status, _) = send(
        &app,
        post_json("/api/round1/immunity", Some(PLAYER_TOKEN), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json("/api/sessions", Some(PLAYER_TOKEN), json!({ "round": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json(
            "/api/round3/teams",
            Some(PLAYER_TOKEN),
            json!({ "teams": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json(
            "/api/round3/elimination",
            Some(PLAYER_TOKEN),
            json!({ "members": ["a", "b"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_token_allows_everything() {
    let app = setup_tokened_app();

    let (status, _) = send(
        &app,
        post_json(
            "/api/players",
            Some(ADMIN_TOKEN),
            json!({ "preferredName": "ash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json("/api/round1/immunity", Some(ADMIN_TOKEN), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json("/api/sessions", Some(ADMIN_TOKEN), json!({ "round": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_token_is_anonymous() {
    let app = setup_tokened_app();

    let (status, _) = send(
        &app,
        post_json(
            "/api/players",
            Some("stale-or-guessed"),
            json!({ "preferredName": "ash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_check_runs_before_validation() {
    let app = setup_tokened_app();

    // invalid payload plus missing token: the role gate answers first
    let (status, _) = send(
        &app,
        post_json("/api/round2/entries", None, json!({ "player": "", "money": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_auth_grants_admin_to_everyone() {
    let state = AppState::new(Arc::new(MemoryStore::new()), AuthTokens::default());
    let app = build_router(state);

    let (status, _) = send(&app, post_json("/api/round1/immunity", None, json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json("/api/sessions", None, json!({ "round": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
