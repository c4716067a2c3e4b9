use payment_service::{build_router, config::Config, AppState};
use service_core::error::AppError;
use service_core::observability::{init_metrics, init_tracing};
use service_core::server;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        auth_service_url = %config.auth_service_url,
        notification_service_url = %config.notification_service_url,
        timeout_secs = config.inter_service_timeout.as_secs(),
        "Starting ledger service"
    );

    let state = AppState::new(config.clone()).map_err(AppError::ConfigError)?;
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
