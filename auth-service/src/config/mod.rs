use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_PORT: u16 = 3001;

/// Issued tokens are valid for this long.
pub const TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret. Loaded once at startup and never logged.
    pub secret: Secret<String>,
    pub token_expiry_hours: i64,
}

impl AuthConfig {
    /// Load configuration from the environment.
    ///
    /// Fails when no signing secret can be loaded, so the process exits non-zero.
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;

        let config = AuthConfig {
            common,
            service_name: core_config::get_env("SERVICE_NAME", Some("auth-service"))?,
            jwt: JwtConfig {
                secret: load_signing_secret(
                    env::var("JWT_SECRET").ok(),
                    env::var("JWT_SECRET_FILE").ok(),
                )?,
                token_expiry_hours: TOKEN_EXPIRY_HOURS,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.token_expiry_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Token expiry must be positive"
            )));
        }
        if self.jwt.secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT signing secret must not be empty"
            )));
        }
        Ok(())
    }
}

/// Resolve the signing secret: `JWT_SECRET` wins, otherwise the trimmed
/// contents of the file named by `JWT_SECRET_FILE`.
///
/// Blank values count as unset. Error messages name the variable or path,
/// never the secret.
pub fn load_signing_secret(
    jwt_secret: Option<String>,
    jwt_secret_file: Option<String>,
) -> Result<Secret<String>, AppError> {
    if let Some(secret) = jwt_secret.filter(|s| !s.trim().is_empty()) {
        return Ok(Secret::new(secret));
    }

    let path = jwt_secret_file
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET or JWT_SECRET_FILE must be set"
            ))
        })?;

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Failed to read JWT_SECRET_FILE '{}': {}",
            path,
            e
        ))
    })?;

    let secret = contents.trim();
    if secret.is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "JWT_SECRET_FILE '{}' is empty",
            path
        )));
    }

    Ok(Secret::new(secret.to_string()))
}
