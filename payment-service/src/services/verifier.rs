//! Token verification delegated to the identity service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::collections::HashMap;
use thiserror::Error;

/// Identity proven by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The identity service answered and said no.
    #[error("token rejected")]
    Rejected,

    /// No usable answer: timeout, connection failure, unexpected status or body.
    #[error("identity service unreachable: {0}")]
    Unreachable(anyhow::Error),
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(
        &self,
        token: &str,
        request_id: Option<&str>,
    ) -> Result<VerifiedIdentity, VerifyError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponseBody {
    valid: bool,
    user_id: Option<String>,
    email: Option<String>,
}

/// Calls `POST {auth_service_url}/verify` once per request. No caching.
#[derive(Clone)]
pub struct HttpTokenVerifier {
    client: Client,
    verify_url: String,
}

impl HttpTokenVerifier {
    /// `client` carries the inter-service timeout.
    pub fn new(client: Client, auth_service_url: &str) -> Self {
        Self {
            client,
            verify_url: format!("{}/verify", auth_service_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    #[tracing::instrument(skip(self, token), fields(url = %self.verify_url))]
    async fn verify(
        &self,
        token: &str,
        request_id: Option<&str>,
    ) -> Result<VerifiedIdentity, VerifyError> {
        let response = self
            .client
            .traced_post(&self.verify_url)
            .bearer_auth(token)
            .request_id(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token verification request failed");
                VerifyError::Unreachable(anyhow::anyhow!("verify request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(VerifyError::Rejected);
        }
        if !status.is_success() {
            return Err(VerifyError::Unreachable(anyhow::anyhow!(
                "identity service returned {}",
                status
            )));
        }

        let body: VerifyResponseBody = response.json().await.map_err(|e| {
            VerifyError::Unreachable(anyhow::anyhow!("malformed verify response: {}", e))
        })?;

        if !body.valid {
            return Err(VerifyError::Rejected);
        }

        match (body.user_id, body.email) {
            (Some(user_id), Some(email)) => Ok(VerifiedIdentity { user_id, email }),
            _ => Err(VerifyError::Unreachable(anyhow::anyhow!(
                "verify response is missing userId or email"
            ))),
        }
    }
}

/// In-process verifier over a fixed token table.
///
/// Same contract as [`HttpTokenVerifier`] without the network hop. When built
/// with [`StaticTokenVerifier::unreachable`] every call fails as if the
/// identity service were down.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
    unreachable: bool,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user_id: &str, email: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            VerifiedIdentity {
                user_id: user_id.to_string(),
                email: email.to_string(),
            },
        );
        self
    }

    pub fn unreachable() -> Self {
        Self {
            tokens: HashMap::new(),
            unreachable: true,
        }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(
        &self,
        token: &str,
        _request_id: Option<&str>,
    ) -> Result<VerifiedIdentity, VerifyError> {
        if self.unreachable {
            return Err(VerifyError::Unreachable(anyhow::anyhow!(
                "connection refused"
            )));
        }
        self.tokens.get(token).cloned().ok_or(VerifyError::Rejected)
    }
}
