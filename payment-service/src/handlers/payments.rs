//! Ledger operations. Every route here sits behind the auth gate.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use service_core::{
    error::AppError,
    extract::{validated, JsonBody},
    middleware::{security_context::SecurityContext, tracing::REQUEST_ID_HEADER},
    observability::SecurityLog,
};
use std::sync::Arc;

use crate::{
    dtos::{
        PaymentHistoryResponse, PaymentNotification, PaymentResponse, ProcessPaymentRequest,
        ProcessPaymentResponse,
    },
    middleware::AuthUser,
    models::LedgerEntry,
    services::Notifier,
    AppState,
};

/// Record a payment for the authenticated caller and notify them.
pub async fn process_payment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: SecurityContext,
    headers: HeaderMap,
    body: JsonBody<ProcessPaymentRequest>,
) -> Result<Json<ProcessPaymentResponse>, AppError> {
    let claimed = body.as_ref().ok();
    let claimed_amount = claimed
        .and_then(|req| req.amount)
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string());
    let claimed_recipient = claimed
        .and_then(|req| req.recipient.clone())
        .unwrap_or_else(|| "-".to_string());

    state
        .security_log
        .normal("PaymentProcessingAttempt")
        .request(&ctx)
        .detail("userId", &user.user_id)
        .detail("email", &user.email)
        .detail("amount", &claimed_amount)
        .detail("recipient", &claimed_recipient)
        .emit();

    let req = match validated(body) {
        Ok(req) => req,
        Err(e) => {
            state
                .security_log
                .suspicious("PaymentProcessingFailure")
                .request(&ctx)
                .detail("userId", &user.user_id)
                .detail("amount", &claimed_amount)
                .detail("reason", "ValidationError")
                .emit();
            return Err(e);
        }
    };

    let (Some(amount), Some(recipient)) = (req.amount, req.recipient) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Amount and recipient are required"
        )));
    };

    let entry = LedgerEntry::completed(
        user.user_id.clone(),
        user.email.clone(),
        amount,
        recipient,
        req.description,
    );
    let notification = PaymentNotification::payment_success(&entry);
    let payment_id = entry.id.clone();

    if let Err(e) = state.repository.save(entry).await {
        state
            .security_log
            .suspicious("PaymentProcessingFailure")
            .request(&ctx)
            .detail("userId", &user.user_id)
            .detail("amount", amount)
            .detail("error", &e)
            .emit();
        return Err(AppError::InternalError(e));
    }

    state
        .security_log
        .normal("PaymentProcessingSuccess")
        .request(&ctx)
        .detail("paymentId", &payment_id)
        .detail("userId", &user.user_id)
        .detail("amount", amount)
        .emit();

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    dispatch_notification(
        state.notifier.clone(),
        state.security_log.clone(),
        notification,
        request_id,
    );

    Ok(Json(ProcessPaymentResponse {
        success: true,
        payment_id,
        message: "Payment processed successfully".to_string(),
    }))
}

/// Fire and forget: the outcome only reaches the log.
fn dispatch_notification(
    notifier: Arc<dyn Notifier>,
    security_log: SecurityLog,
    notification: PaymentNotification,
    request_id: Option<String>,
) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification, request_id.as_deref()).await {
            security_log
                .untagged("NotificationDispatchFailure")
                .detail("paymentId", &notification.payment_id)
                .detail("userId", &notification.user_id)
                .detail("error", &e)
                .emit();
        }
    });
}

/// The caller's own ledger entries, oldest first.
pub async fn payment_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: SecurityContext,
) -> Result<Json<PaymentHistoryResponse>, AppError> {
    state
        .security_log
        .normal("PaymentHistoryRetrieval")
        .request(&ctx)
        .detail("userId", &user.user_id)
        .emit();

    let payments = state.repository.find_by_owner(&user.user_id).await?;

    Ok(Json(PaymentHistoryResponse { payments }))
}

/// One ledger entry, visible only to the account that created it.
pub async fn get_payment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: SecurityContext,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    state
        .security_log
        .normal("PaymentDetailsRetrieval")
        .request(&ctx)
        .detail("userId", &user.user_id)
        .detail("paymentId", &payment_id)
        .emit();

    let payment = state
        .repository
        .find_by_id(&payment_id)
        .await?
        .filter(|entry| entry.user_id == user.user_id);

    match payment {
        Some(payment) => Ok(Json(PaymentResponse { payment })),
        None => {
            state
                .security_log
                .suspicious("PaymentDetailsNotFound")
                .request(&ctx)
                .detail("userId", &user.user_id)
                .detail("paymentId", &payment_id)
                .emit();
            Err(AppError::NotFound(anyhow::anyhow!("Payment not found")))
        }
    }
}
