use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::{
    error::AppError,
    extract::{validated, JsonBody},
    middleware::security_context::SecurityContext,
};

use crate::{
    dtos::{
        MarkReadResponse, NotificationListResponse, SendNotificationRequest,
        SendNotificationResponse,
    },
    models::Notification,
    AppState,
};

/// Record a notification. Callers are trusted internal services.
pub async fn send_notification(
    State(state): State<AppState>,
    ctx: SecurityContext,
    body: JsonBody<SendNotificationRequest>,
) -> Result<(StatusCode, Json<SendNotificationResponse>), AppError> {
    let claimed = body.as_ref().ok();
    let claimed_user = claimed
        .and_then(|req| req.user_id.clone())
        .unwrap_or_else(|| "-".to_string());
    let claimed_kind = claimed
        .and_then(|req| req.kind.clone())
        .unwrap_or_else(|| "-".to_string());

    state
        .security_log
        .normal("NotificationReceived")
        .request(&ctx)
        .detail("userId", &claimed_user)
        .detail("type", &claimed_kind)
        .emit();

    let req = match validated(body) {
        Ok(req) => req,
        Err(e) => {
            state
                .security_log
                .suspicious("NotificationStoreFailure")
                .request(&ctx)
                .detail("userId", &claimed_user)
                .detail("reason", "ValidationError")
                .emit();
            return Err(e);
        }
    };

    let (Some(user_id), Some(kind), Some(message)) = (req.user_id, req.kind, req.message) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "userId, type and message are required"
        )));
    };

    let notification = Notification::sent(user_id, req.email, kind, message, req.payment_id);
    let notification_id = notification.id.clone();
    let user_id = notification.user_id.clone();

    if let Err(e) = state.repository.save(notification).await {
        state
            .security_log
            .suspicious("NotificationStoreFailure")
            .request(&ctx)
            .detail("userId", &user_id)
            .detail("error", &e)
            .emit();
        return Err(AppError::InternalError(e));
    }

    state
        .security_log
        .normal("NotificationStored")
        .request(&ctx)
        .detail("notificationId", &notification_id)
        .detail("userId", &user_id)
        .emit();

    Ok((
        StatusCode::CREATED,
        Json(SendNotificationResponse {
            success: true,
            notification_id,
            message: "Notification stored".to_string(),
        }),
    ))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationListResponse>, AppError> {
    state
        .security_log
        .normal("NotificationRetrievalAttempt")
        .request(&ctx)
        .detail("userId", &user_id)
        .emit();

    let notifications = state.repository.find_by_recipient(&user_id).await?;

    Ok(Json(NotificationListResponse { notifications }))
}

/// Idempotent: marking a read notification again returns it unchanged.
pub async fn mark_read(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(notification_id): Path<String>,
) -> Result<Json<MarkReadResponse>, AppError> {
    state
        .security_log
        .normal("NotificationMarkReadAttempt")
        .request(&ctx)
        .detail("notificationId", &notification_id)
        .emit();

    match state.repository.mark_read(&notification_id).await? {
        Some(notification) => {
            state
                .security_log
                .normal("NotificationMarkReadSuccess")
                .request(&ctx)
                .detail("notificationId", &notification_id)
                .detail("userId", &notification.user_id)
                .emit();

            Ok(Json(MarkReadResponse {
                message: "Notification marked as read".to_string(),
                notification,
            }))
        }
        None => {
            state
                .security_log
                .suspicious("NotificationMarkReadFailure")
                .request(&ctx)
                .detail("notificationId", &notification_id)
                .detail("reason", "NotFound")
                .emit();
            Err(AppError::NotFound(anyhow::anyhow!("Notification not found")))
        }
    }
}
