use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;

pub const DEFAULT_PORT: u16 = 3003;

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub common: core_config::Config,
    pub service_name: String,
}

impl NotificationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;

        Ok(NotificationConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("notification-service"))?,
        })
    }
}
