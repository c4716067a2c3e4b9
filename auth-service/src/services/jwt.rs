use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

/// Issues and checks HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        tracing::info!(
            expiry_hours = config.token_expiry_hours,
            "JWT service initialized with HS256 secret"
        );

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours: config.token_expiry_hours,
        }
    }

    /// Sign a token for an account with the configured lifetime.
    pub fn generate_token(&self, account_id: &str, email: &str) -> Result<String, anyhow::Error> {
        self.generate_token_with_ttl(account_id, email, Duration::hours(self.token_expiry_hours))
    }

    /// Sign a token with an explicit lifetime. A negative `ttl` yields an
    /// already-expired token.
    pub fn generate_token_with_ttl(
        &self,
        account_id: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Check signature and expiry. Only HS256 is accepted and expiry has no leeway.
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}
