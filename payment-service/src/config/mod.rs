use service_core::config::{self as core_config, get_env, parse_base_url};
use service_core::error::AppError;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Debug, Clone)]
pub struct Config {
    pub common: core_config::Config,
    pub service_name: String,
    pub auth_service_url: String,
    pub notification_service_url: String,
    /// Applied to every outbound call (token verification and notification dispatch).
    pub inter_service_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;

        let auth_service_url = parse_base_url(
            "AUTH_SERVICE_URL",
            &get_env("AUTH_SERVICE_URL", Some("http://localhost:3001"))?,
        )?;
        let notification_service_url = parse_base_url(
            "NOTIFICATION_SERVICE_URL",
            &get_env("NOTIFICATION_SERVICE_URL", Some("http://localhost:3003"))?,
        )?;

        let timeout_secs = parse_timeout_secs(&get_env("INTER_SERVICE_TIMEOUT_SECS", Some("5"))?)?;

        Ok(Self {
            common,
            service_name: get_env("SERVICE_NAME", Some("payment-service"))?,
            auth_service_url,
            notification_service_url,
            inter_service_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "INTER_SERVICE_TIMEOUT_SECS must be a whole number of seconds: {}",
            e
        ))
    })?;

    if secs == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "INTER_SERVICE_TIMEOUT_SECS must be greater than 0"
        )));
    }
    Ok(secs)
}
