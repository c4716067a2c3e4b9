//! Cross-service workflow integration tests library.
//!
//! Starts the identity, ledger and notification services in-process on
//! ephemeral ports, wired to each other over real HTTP, and provides a small
//! client for driving them.

use anyhow::{anyhow, Result};
use secrecy::Secret;
use std::sync::Once;
use std::time::Duration;
use tokio::net::TcpListener;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("warn,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const WORKFLOW_JWT_SECRET: &str = "workflow-test-secret";

/// Base URLs of one running service stack.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub auth: String,
    pub payment: String,
    pub notification: String,
}

impl ServiceEndpoints {
    pub fn health_urls(&self) -> Vec<(&'static str, String)> {
        vec![
            ("auth-service", format!("{}/health", self.auth)),
            ("payment-service", format!("{}/health", self.payment)),
            ("notification-service", format!("{}/health", self.notification)),
        ]
    }
}

async fn listen() -> Result<(TcpListener, String)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);
    Ok((listener, url))
}

fn serve(listener: TcpListener, router: service_core::axum::Router) {
    tokio::spawn(async move {
        if let Err(e) = service_core::server::serve(listener, router).await {
            tracing::error!(error = %e, "Service task exited");
        }
    });
}

/// Start all three services. They run until the test runtime shuts down.
pub async fn spawn_services() -> Result<ServiceEndpoints> {
    let (auth_listener, auth_url) = listen().await?;
    let (notification_listener, notification_url) = listen().await?;
    let (payment_listener, payment_url) = listen().await?;

    let auth_config = auth_service::config::AuthConfig {
        common: service_core::config::Config::for_tests(),
        service_name: "auth-service".to_string(),
        jwt: auth_service::config::JwtConfig {
            secret: Secret::new(WORKFLOW_JWT_SECRET.to_string()),
            token_expiry_hours: auth_service::config::TOKEN_EXPIRY_HOURS,
        },
    };
    serve(
        auth_listener,
        auth_service::build_router(auth_service::AppState::new(auth_config)),
    );

    let notification_config = notification_service::config::NotificationConfig {
        common: service_core::config::Config::for_tests(),
        service_name: "notification-service".to_string(),
    };
    serve(
        notification_listener,
        notification_service::build_router(notification_service::AppState::new(
            notification_config,
        )),
    );

    let payment_config = payment_service::config::Config {
        common: service_core::config::Config::for_tests(),
        service_name: "payment-service".to_string(),
        auth_service_url: auth_url.clone(),
        notification_service_url: notification_url.clone(),
        inter_service_timeout: Duration::from_secs(5),
    };
    serve(
        payment_listener,
        payment_service::build_router(payment_service::AppState::new(payment_config)?),
    );

    Ok(ServiceEndpoints {
        auth: auth_url,
        payment: payment_url,
        notification: notification_url,
    })
}

/// Poll every service's `/health` until all answer 2xx or `timeout` elapses.
pub async fn wait_for_services(endpoints: &ServiceEndpoints, timeout: Duration) -> Result<()> {
    let health_urls = endpoints.health_urls();
    let client = reqwest::Client::new();
    let start = std::time::Instant::now();

    loop {
        let mut unhealthy_services = Vec::new();

        for (name, url) in &health_urls {
            match client.get(url).timeout(Duration::from_secs(2)).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => unhealthy_services.push(format!("{} (status: {})", name, resp.status())),
                Err(e) => unhealthy_services.push(format!("{} (error: {})", name, e)),
            }
        }

        if unhealthy_services.is_empty() {
            tracing::debug!("All services are healthy");
            return Ok(());
        }

        if start.elapsed() > timeout {
            return Err(anyhow!(
                "Services not healthy after {:?}: {}",
                timeout,
                unhealthy_services.join(", ")
            ));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// One running stack plus an HTTP client acting as the end user.
pub struct WorkflowTestContext {
    pub endpoints: ServiceEndpoints,
    pub client: reqwest::Client,
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
}

impl WorkflowTestContext {
    pub async fn new() -> Result<Self> {
        init_tracing();
        let endpoints = spawn_services().await?;
        wait_for_services(&endpoints, Duration::from_secs(10)).await?;

        Ok(Self {
            endpoints,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
            auth_token: None,
            user_id: None,
        })
    }

    /// Random address so repeated runs never collide.
    pub fn unique_email(prefix: &str) -> String {
        format!("{}+{}@x.com", prefix, uuid::Uuid::new_v4().simple())
    }

    /// Attach the stored bearer token, if any.
    pub fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/register", self.endpoints.auth))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Log in and remember the token and account id for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let resp = self
            .client
            .post(format!("{}/login", self.endpoints.auth))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("login failed with status {}", resp.status()));
        }

        let body: serde_json::Value = resp.json().await?;
        let token = body["token"]
            .as_str()
            .ok_or_else(|| anyhow!("login response has no token"))?;
        let user_id = body["userId"]
            .as_str()
            .ok_or_else(|| anyhow!("login response has no userId"))?;

        self.auth_token = Some(token.to_string());
        self.user_id = Some(user_id.to_string());
        Ok(())
    }

    pub async fn process_payment(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .with_auth(self.client.post(format!("{}/process", self.endpoints.payment)))
            .json(&body)
            .send()
            .await?)
    }

    pub async fn history(&self) -> Result<reqwest::Response> {
        Ok(self
            .with_auth(self.client.get(format!("{}/history", self.endpoints.payment)))
            .send()
            .await?)
    }

    pub async fn notifications_for(&self, user_id: &str) -> Result<serde_json::Value> {
        Ok(self
            .client
            .get(format!(
                "{}/notifications/{}",
                self.endpoints.notification, user_id
            ))
            .send()
            .await?
            .json()
            .await?)
    }

    /// Poll until `user_id` has at least `count` notifications.
    pub async fn wait_for_notifications(
        &self,
        user_id: &str,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<serde_json::Value>> {
        let start = std::time::Instant::now();
        loop {
            let body = self.notifications_for(user_id).await?;
            let notifications = body["notifications"].as_array().cloned().unwrap_or_default();
            if notifications.len() >= count {
                return Ok(notifications);
            }
            if start.elapsed() > timeout {
                return Err(anyhow!(
                    "expected {} notifications for {}, found {}",
                    count,
                    user_id,
                    notifications.len()
                ));
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}
