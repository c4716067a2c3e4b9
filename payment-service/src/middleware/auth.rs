use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use service_core::{
    error::{AppError, AuthFailure},
    extract::bearer_token,
    middleware::{security_context::SecurityContext, tracing::REQUEST_ID_HEADER},
    observability::Classification,
};

use crate::{
    services::{VerifiedIdentity, VerifyError},
    AppState,
};

pub const AUTH_SERVICE: &str = "auth-service";

/// Classification for a verification that failed because the identity
/// service could not be reached. `None` leaves the event untagged.
pub fn unreachable_classification() -> Option<Classification> {
    Some(Classification::Normal)
}

/// Gate for every ledger route: verifies the bearer token with the identity
/// service on each request and stores the caller's identity for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    ctx: SecurityContext,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers()).map(str::to_string);

    state
        .security_log
        .normal("AuthenticationAttempt")
        .request(&ctx)
        .detail("hasToken", token.is_some())
        .emit();

    let Some(token) = token else {
        state
            .security_log
            .suspicious("AuthenticationFailure")
            .request(&ctx)
            .detail("reason", AuthFailure::NoTokenProvided)
            .emit();
        return AppError::AuthError(AuthFailure::NoTokenProvided).into_response();
    };

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match state.verifier.verify(&token, request_id.as_deref()).await {
        Ok(identity) => {
            state
                .security_log
                .normal("AuthenticationSuccess")
                .request(&ctx)
                .detail("userId", &identity.user_id)
                .detail("email", &identity.email)
                .emit();

            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(VerifyError::Rejected) => {
            state
                .security_log
                .suspicious("AuthenticationFailure")
                .request(&ctx)
                .detail("reason", AuthFailure::InvalidToken)
                .emit();
            AppError::AuthError(AuthFailure::InvalidToken).into_response()
        }
        Err(VerifyError::Unreachable(source)) => {
            let mut event = state
                .security_log
                .untagged("AuthenticationError")
                .request(&ctx)
                .detail("reason", "AuthServiceUnreachable")
                .detail("error", &source);
            if let Some(classification) = unreachable_classification() {
                event = event.classification(classification);
            }
            event.emit();

            AppError::ServiceUnreachable {
                service: AUTH_SERVICE,
                source,
            }
            .into_response()
        }
    }
}

/// Identity of the caller, available on routes behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedIdentity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<VerifiedIdentity>()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Authenticated identity missing from request extensions"
                ))
            })?;

        Ok(AuthUser(identity.clone()))
    }
}
