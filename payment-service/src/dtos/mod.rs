use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::LedgerEntry;

#[derive(Debug, Deserialize, Validate)]
pub struct ProcessPaymentRequest {
    #[validate(
        required(message = "Amount is required"),
        range(exclusive_min = 0.0, message = "Amount must be greater than 0")
    )]
    pub amount: Option<f64>,

    #[validate(
        required(message = "Recipient is required"),
        length(min = 1, message = "Recipient is required")
    )]
    pub recipient: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponse {
    pub success: bool,
    pub payment_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentHistoryResponse {
    pub payments: Vec<LedgerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment: LedgerEntry,
}

/// Body posted to the notification service after a payment completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub user_id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub payment_id: String,
}

impl PaymentNotification {
    pub const PAYMENT_SUCCESS: &'static str = "PAYMENT_SUCCESS";

    pub fn payment_success(entry: &LedgerEntry) -> Self {
        Self {
            user_id: entry.user_id.clone(),
            email: entry.email.clone(),
            kind: Self::PAYMENT_SUCCESS.to_string(),
            message: format!(
                "Your payment of ${} to {} was successful.",
                entry.amount, entry.recipient
            ),
            payment_id: entry.id.clone(),
        }
    }
}
