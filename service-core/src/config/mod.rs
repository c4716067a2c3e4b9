use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use std::env;

/// Settings shared by every service: listen port, log level and the
/// optional OTLP collector endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, rename = "otel_exporter_otlp_endpoint")]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from `configuration.*` (optional) then the process environment
    /// (`PORT`, `LOG_LEVEL`, `OTEL_EXPORTER_OTLP_ENDPOINT`).
    pub fn load(default_port: u16) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .set_default("port", i64::from(default_port))?
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }
        Ok(())
    }

    /// Config for in-process tests: ephemeral port, no exporter.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            log_level: "error".to_string(),
            otlp_endpoint: None,
        }
    }
}

/// Read an environment variable, falling back to `default` when unset.
/// Without a default, an unset variable is a configuration error.
pub fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

/// Validate that `url` is an absolute http(s) base URL and strip any trailing slash.
pub fn parse_base_url(key: &str, url: &str) -> Result<String, AppError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be an absolute http(s) URL, got '{}'",
            key,
            url
        )));
    }
    Ok(trimmed.to_string())
}
