use service_core::{
    axum::{extract::State, Json},
    middleware::security_context::SecurityContext,
};

use crate::{dtos::auth::HealthResponse, AppState};

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>, ctx: SecurityContext) -> Json<HealthResponse> {
    state
        .security_log
        .normal("HealthCheck")
        .request(&ctx)
        .emit();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        timestamp: chrono::Utc::now(),
    })
}
