mod common;

use axum::http::StatusCode;
use common::{LogCapture, TestApp, ALICE_TOKEN};
use payment_service::services::{RecordingNotifier, StaticTokenVerifier};
use serde_json::json;

#[tokio::test]
async fn missing_token_is_suspicious() {
    let (log, _guard) = LogCapture::install();
    let app = TestApp::new();

    let (status, _) = app.get("/history", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let attempts = log.events("AuthenticationAttempt");
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].contains(r#"hasToken="false""#));

    let failures = log.events("AuthenticationFailure");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains(r#"classification="Suspicious""#));
    assert!(failures[0].contains(r#"reason="NoTokenProvided""#));
}

#[tokio::test]
async fn rejected_token_is_suspicious_and_not_logged() {
    let (log, _guard) = LogCapture::install();
    let app = TestApp::new();

    let (status, _) = app
        .process(Some("forged-credential"), json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let failures = log.events("AuthenticationFailure");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains(r#"reason="InvalidToken""#));
    assert!(log.events("PaymentProcessingAttempt").is_empty());
    assert!(!log.text().contains("forged-credential"));
}

#[tokio::test]
async fn unreachable_identity_service_is_tagged_normal() {
    let (log, _guard) = LogCapture::install();
    let app = TestApp::build(StaticTokenVerifier::unreachable(), RecordingNotifier::new());

    let (status, _) = app
        .process(Some(ALICE_TOKEN), json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let errors = log.events("AuthenticationError");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(r#"classification="Normal""#));
    assert!(errors[0].contains(r#"reason="AuthServiceUnreachable""#));
    assert!(log.events("AuthenticationFailure").is_empty());
}

#[tokio::test]
async fn rejected_payment_input_is_logged() {
    let (log, _guard) = LogCapture::install();
    let app = TestApp::new();

    let (status, _) = app
        .process(Some(ALICE_TOKEN), json!({ "amount": -3, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let attempts = log.events("PaymentProcessingAttempt");
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].contains(r#"amount="-3""#));

    let failures = log.events("PaymentProcessingFailure");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains(r#"classification="Suspicious""#));
    assert!(failures[0].contains(r#"reason="ValidationError""#));
}

#[tokio::test]
async fn successful_payment_is_logged_without_the_token() {
    let (log, _guard) = LogCapture::install();
    let app = TestApp::new();

    let (status, body) = app
        .process(Some(ALICE_TOKEN), json!({ "amount": 10, "recipient": "bob" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let payment_id = body["paymentId"].as_str().unwrap();

    let successes = log.events("PaymentProcessingSuccess");
    assert_eq!(successes.len(), 1);
    assert!(successes[0].contains(r#"classification="Normal""#));
    assert!(successes[0].contains(payment_id));
    assert_eq!(log.events("AuthenticationSuccess").len(), 1);
    assert!(!log.text().contains(ALICE_TOKEN));
}
