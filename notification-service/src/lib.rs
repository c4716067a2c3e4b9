pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post, put},
    Router,
};
use service_core::middleware::with_common_layers;
use service_core::observability::{metrics_endpoint, SecurityLog};
use std::sync::Arc;

use config::NotificationConfig;
use services::{InMemoryNotificationRepository, NotificationRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: NotificationConfig,
    pub repository: Arc<dyn NotificationRepository>,
    pub security_log: SecurityLog,
}

impl AppState {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemoryNotificationRepository::new()))
    }

    pub fn with_repository(
        config: NotificationConfig,
        repository: Arc<dyn NotificationRepository>,
    ) -> Self {
        let security_log = SecurityLog::new(config.service_name.clone());
        Self {
            config,
            repository,
            security_log,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/send", post(handlers::notifications::send_notification))
        .route(
            "/notifications/:user_id",
            get(handlers::notifications::list_notifications),
        )
        .route("/read/:id", put(handlers::notifications::mark_read))
        .with_state(state);

    with_common_layers(router)
}
