pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use service_core::middleware::with_common_layers;
use service_core::observability::{metrics_endpoint, SecurityLog};
use std::sync::Arc;

use config::Config;
use services::{
    HttpNotifier, HttpTokenVerifier, InMemoryPaymentRepository, Notifier, PaymentRepository,
    TokenVerifier,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repository: Arc<dyn PaymentRepository>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub notifier: Arc<dyn Notifier>,
    pub security_log: SecurityLog,
}

impl AppState {
    /// Production wiring: in-memory ledger, HTTP verifier and notifier sharing
    /// one client with the configured timeout.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.inter_service_timeout)
            .build()?;

        let verifier = HttpTokenVerifier::new(client.clone(), &config.auth_service_url);
        let notifier = HttpNotifier::new(client, &config.notification_service_url);

        Ok(Self::with_parts(
            config,
            Arc::new(InMemoryPaymentRepository::new()),
            Arc::new(verifier),
            Arc::new(notifier),
        ))
    }

    pub fn with_parts(
        config: Config,
        repository: Arc<dyn PaymentRepository>,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let security_log = SecurityLog::new(config.service_name.clone());
        Self {
            config,
            repository,
            verifier,
            notifier,
            security_log,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let ledger_routes = Router::new()
        .route("/process", post(handlers::payments::process_payment))
        .route("/history", get(handlers::payments::payment_history))
        .route("/payment/:id", get(handlers::payments::get_payment))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics_endpoint))
        .merge(ledger_routes)
        .with_state(state);

    with_common_layers(router)
}
