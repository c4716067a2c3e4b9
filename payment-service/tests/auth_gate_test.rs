mod common;

use axum::http::StatusCode;
use common::{TestApp, ALICE_TOKEN};
use payment_service::services::{RecordingNotifier, StaticTokenVerifier};
use serde_json::json;

#[tokio::test]
async fn missing_token_is_rejected_on_every_ledger_route() {
    let app = TestApp::new();

    let (status, body) = app
        .process(None, json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    let (status, _) = app.get("/history", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/payment/anything", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_token_creates_no_entry() {
    let app = TestApp::new();

    let (status, body) = app
        .process(Some("forged"), json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let (status, body) = app.get("/history", Some(ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payments"].as_array().unwrap().len(), 0);
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn non_bearer_scheme_counts_as_missing() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            axum::http::Request::builder()
                .method("GET")
                .uri("/history")
                .header("authorization", format!("Basic {}", ALICE_TOKEN))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn unreachable_identity_service_is_server_error() {
    let app = TestApp::build(StaticTokenVerifier::unreachable(), RecordingNotifier::new());

    let (status, body) = app
        .process(Some(ALICE_TOKEN), json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to reach auth-service");
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn token_is_checked_before_body_validation() {
    let app = TestApp::new();

    let (status, _) = app.process(None, json!({ "amount": -5 })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
