//! Request tracing middleware.
//!
//! Provides request ID extraction and generation for log correlation.

use axum::{
    body::Body,
    http::{header::HeaderName, Extensions, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Middleware that extracts or generates a request ID.
///
/// An incoming `X-Request-ID` header is reused; otherwise a UUID v4 is
/// generated. The ID lands in request extensions, in the tracing span
/// wrapping the handler, and in the response headers.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = std::time::Instant::now();

        let mut response = next.run(req).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis(),
            "Request completed"
        );

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), header_value);
        }

        response
    }
    .instrument(span)
    .await
}

/// Extracts the request ID from request extensions.
///
/// Returns the request ID if present, or a placeholder if not.
pub fn get_request_id(extensions: &Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string())
}
