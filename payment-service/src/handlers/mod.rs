//! HTTP handlers for payment-service.

pub mod payments;

use axum::{extract::State, Json};
use serde_json::json;
use service_core::middleware::security_context::SecurityContext;

use crate::AppState;

pub async fn health_check(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> Json<serde_json::Value> {
    state
        .security_log
        .normal("HealthCheck")
        .request(&ctx)
        .emit();

    Json(json!({
        "status": "healthy",
        "service": state.config.service_name,
        "timestamp": chrono::Utc::now(),
    }))
}
