pub mod metrics;
pub mod security_context;
pub mod security_headers;
pub mod tracing;

use axum::{Router, middleware::from_fn};
use tower_http::trace::TraceLayer;

/// Wrap a fully-stated router in the layers every service shares.
///
/// Outermost first: security headers, request id, HTTP trace span, metrics,
/// security context capture.
pub fn with_common_layers(router: Router) -> Router {
    router
        .layer(from_fn(security_context::security_context_middleware))
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(tracing::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                ::tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(tracing::request_id_middleware))
        .layer(from_fn(security_headers::security_headers_middleware))
}
