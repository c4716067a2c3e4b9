//! Test helpers for auth-service integration tests.
//!
//! Builds the full router over an in-memory account store and drives it with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use auth_service::{
    build_router,
    config::{AuthConfig, JwtConfig, TOKEN_EXPIRY_HOURS},
    AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::Secret;
use service_core::config::Config;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: Config::for_tests(),
        service_name: "auth-service".to_string(),
        jwt: JwtConfig {
            secret: Secret::new(TEST_SECRET.to_string()),
            token_expiry_hours: TOKEN_EXPIRY_HOURS,
        },
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(test_config());
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Send one request and return status plus parsed JSON body (Null when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn register(&self, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.post_json(
            "/register",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.post_json(
            "/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register then log in, returning `(token, userId)`.
    pub async fn signed_in(&self, email: &str, password: &str) -> (String, String) {
        let (status, _) = self.register(email, password).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(email, password).await;
        assert_eq!(status, StatusCode::OK);
        (
            body["token"].as_str().unwrap().to_string(),
            body["userId"].as_str().unwrap().to_string(),
        )
    }

    pub async fn verify_with_header(&self, authorization: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/verify")
                .header("authorization", authorization)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Everything a scoped `tracing` subscriber writes while installed.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Capture this thread's events at INFO and above until the guard drops.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Security log lines for one event name.
    pub fn events(&self, event: &str) -> Vec<String> {
        let needle = format!("event=\"{}\"", event);
        self.text()
            .lines()
            .filter(|line| line.contains(&needle))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
