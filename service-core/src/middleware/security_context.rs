use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::sync::Arc;

use crate::error::ErrorResponse;
use crate::observability::security_log::RequestMetadata;

/// Largest request body accepted by any service.
pub const MAX_REQUEST_BODY: usize = 1024 * 1024;

/// Buffer the request body once, capture the security log metadata, and hand
/// the handler an intact body.
pub async fn security_context_middleware(req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();

    let bytes = match Limited::new(body, MAX_REQUEST_BODY).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let (status, error) = if e.downcast_ref::<LengthLimitError>().is_some() {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            } else {
                (StatusCode::BAD_REQUEST, "Failed to read request body")
            };
            tracing::warn!(error = %e, path = %parts.uri.path(), "Rejecting request body");
            return (
                status,
                Json(ErrorResponse {
                    error: error.to_string(),
                    details: None,
                }),
            )
                .into_response();
        }
    };

    let metadata = RequestMetadata::from_request(&parts.method, &parts.uri, &parts.headers, &bytes);

    let mut req = Request::from_parts(parts, Body::from(bytes));
    req.extensions_mut().insert(Arc::new(metadata));

    next.run(req).await
}

/// Handler access to the triggering request's metadata.
///
/// Falls back to header-only metadata (empty `content`) when the router does
/// not run [`security_context_middleware`].
#[derive(Debug, Clone)]
pub struct SecurityContext(pub Arc<RequestMetadata>);

impl std::ops::Deref for SecurityContext {
    type Target = RequestMetadata;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let metadata = match parts.extensions.get::<Arc<RequestMetadata>>() {
            Some(metadata) => metadata.clone(),
            None => Arc::new(RequestMetadata::from_request(
                &parts.method,
                &parts.uri,
                &parts.headers,
                &[],
            )),
        };
        Ok(SecurityContext(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware::from_fn, routing::post};
    use tower::ServiceExt;

    async fn echo(ctx: SecurityContext, body: String) -> String {
        format!("{}|{}", ctx.content, body)
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", post(echo))
            .layer(from_fn(security_context_middleware))
    }

    #[tokio::test]
    async fn handler_sees_body_and_redacted_metadata() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"pw123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(
            text,
            r#"{"password":"[REDACTED]"}|{"password":"pw123"}"#
        );
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from(vec![b'a'; MAX_REQUEST_BODY + 1]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
