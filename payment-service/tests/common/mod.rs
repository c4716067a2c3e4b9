//! Test helpers for payment-service integration tests.
//!
//! The router runs with an in-process token table and a recording notifier,
//! so no identity or notification service is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use payment_service::{
    build_router,
    config::Config,
    services::{InMemoryPaymentRepository, RecordingNotifier, StaticTokenVerifier},
    AppState,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

pub const ALICE_TOKEN: &str = "alice-token";
pub const ALICE_ID: &str = "user-alice";
pub const ALICE_EMAIL: &str = "alice@x.com";

pub const BOB_TOKEN: &str = "bob-token";
pub const BOB_ID: &str = "user-bob";
pub const BOB_EMAIL: &str = "bob@x.com";

pub fn test_config() -> Config {
    Config {
        common: service_core::config::Config::for_tests(),
        service_name: "payment-service".to_string(),
        auth_service_url: "http://127.0.0.1:9".to_string(),
        notification_service_url: "http://127.0.0.1:9".to_string(),
        inter_service_timeout: Duration::from_secs(1),
    }
}

pub fn known_users() -> StaticTokenVerifier {
    StaticTokenVerifier::new()
        .with_token(ALICE_TOKEN, ALICE_ID, ALICE_EMAIL)
        .with_token(BOB_TOKEN, BOB_ID, BOB_EMAIL)
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub notifier: RecordingNotifier,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(known_users(), RecordingNotifier::new())
    }

    pub fn build(verifier: StaticTokenVerifier, notifier: RecordingNotifier) -> Self {
        let state = AppState::with_parts(
            test_config(),
            Arc::new(InMemoryPaymentRepository::new()),
            Arc::new(verifier),
            Arc::new(notifier.clone()),
        );
        let router = build_router(state.clone());
        Self {
            state,
            router,
            notifier,
        }
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

    pub async fn process(
        &self,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/process")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Wait for the background dispatch to deliver `count` notifications.
    pub async fn wait_for_notifications(&self, count: usize) -> bool {
        for _ in 0..50 {
            if self.notifier.sent().len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
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
