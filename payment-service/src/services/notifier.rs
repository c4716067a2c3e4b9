//! Best-effort delivery of payment notifications.

use async_trait::async_trait;
use reqwest::Client;
use service_core::observability::TracedClientExt;
use std::sync::{Arc, Mutex};

use crate::dtos::PaymentNotification;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        notification: &PaymentNotification,
        request_id: Option<&str>,
    ) -> anyhow::Result<()>;
}

/// Posts to `{notification_service_url}/send`.
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    send_url: String,
}

impl HttpNotifier {
    pub fn new(client: Client, notification_service_url: &str) -> Self {
        Self {
            client,
            send_url: format!("{}/send", notification_service_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(
        &self,
        notification: &PaymentNotification,
        request_id: Option<&str>,
    ) -> anyhow::Result<()> {
        let response = self
            .client
            .traced_post(&self.send_url)
            .json(notification)
            .request_id(request_id)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("notification request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("notification service returned {}", status);
        }
        Ok(())
    }
}

/// Keeps sent notifications in memory; optionally fails every call.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<PaymentNotification>>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<PaymentNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        notification: &PaymentNotification,
        _request_id: Option<&str>,
    ) -> anyhow::Result<()> {
        if self.failing {
            anyhow::bail!("notification service unavailable");
        }
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("notification record poisoned"))?
            .push(notification.clone());
        Ok(())
    }
}
