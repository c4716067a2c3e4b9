pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    routing::{get, post},
    Json, Router,
};
use service_core::middleware::with_common_layers;
use service_core::observability::{metrics_endpoint, SecurityLog};
use std::sync::Arc;
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};

use crate::config::AuthConfig;
use crate::services::{AccountRepository, AuthService, InMemoryAccountRepository, JwtService};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::verify,
    ),
    components(
        schemas(
            dtos::auth::RegisterRequest,
            dtos::auth::RegisterResponse,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::auth::VerifyRequest,
            dtos::auth::VerifyResponse,
            dtos::auth::HealthResponse,
            dtos::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration, login and token verification"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AuthConfig,
    pub auth_service: AuthService,
    pub security_log: SecurityLog,
}

impl AppState {
    /// State backed by a fresh in-memory account store.
    pub fn new(config: AuthConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemoryAccountRepository::new()))
    }

    pub fn with_repository(config: AuthConfig, accounts: Arc<dyn AccountRepository>) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let security_log = SecurityLog::new(config.service_name.clone());

        Self {
            auth_service: AuthService::new(accounts, jwt),
            security_log,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/verify", post(handlers::verify))
        .with_state(state);

    with_common_layers(router)
}
