use auth_service::{build_router, config::AuthConfig, AppState};
use service_core::error::AppError;
use service_core::observability::{init_metrics, init_tracing};
use service_core::server;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Fail fast: a missing signing secret exits non-zero here.
    let config = AuthConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting identity service"
    );

    let state = AppState::new(config.clone());
    let security_log = state.security_log.clone();
    let app = build_router(state);

    let listener = server::bind(config.common.port).await?;
    let addr = listener.local_addr()?;

    security_log
        .normal("ServerStart")
        .detail("port", addr.port())
        .emit();
    tracing::info!(address = %addr, "Listening");

    server::serve(listener, app).await
}
