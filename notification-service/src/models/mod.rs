use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Read,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Recipient account id.
    pub user_id: String,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Ledger entry this notification is about, if any.
    pub payment_id: Option<String>,
    pub status: NotificationStatus,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Delivery is simulated: a stored notification counts as sent.
    pub fn sent(
        user_id: String,
        email: Option<String>,
        kind: String,
        message: String,
        payment_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            email,
            kind,
            message,
            payment_id,
            status: NotificationStatus::Sent,
            timestamp: Utc::now(),
        }
    }

    pub fn mark_read(&mut self) {
        self.status = NotificationStatus::Read;
    }
}
