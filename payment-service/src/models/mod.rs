use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of one processed payment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    /// Account id of the authenticated sender.
    pub user_id: String,
    pub email: String,
    pub amount: f64,
    pub recipient: String,
    pub description: Option<String>,
    pub status: LedgerStatus,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn completed(
        user_id: String,
        email: String,
        amount: f64,
        recipient: String,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            email,
            amount,
            recipient,
            description,
            status: LedgerStatus::Completed,
            timestamp: Utc::now(),
        }
    }
}

/// Only `completed` is modeled; there are no pending or failed entries.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Completed,
}
