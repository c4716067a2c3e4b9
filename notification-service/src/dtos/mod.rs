use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Notification;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[validate(
        required(message = "userId is required"),
        length(min = 1, message = "userId is required")
    )]
    pub user_id: Option<String>,

    pub email: Option<String>,

    #[serde(rename = "type")]
    #[validate(
        required(message = "type is required"),
        length(min = 1, message = "type is required")
    )]
    pub kind: Option<String>,

    #[validate(
        required(message = "message is required"),
        length(min = 1, message = "message is required")
    )]
    pub message: Option<String>,

    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub notification_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub notification: Notification,
}
