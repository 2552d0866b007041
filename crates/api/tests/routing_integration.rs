//! Integration tests for router plumbing: probes, fallbacks, and the
//! headers every response carries.

mod common;

use axum::http::{Method, StatusCode};
use common::{anonymous_request, create_test_app, parse_response_body};
use tower::ServiceExt;

#[tokio::test]
async fn test_liveness_probe_is_public() {
    let app = create_test_app();

    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/health/live"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/v1/nonexistent"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = create_test_app();

    // Announcements only accept POST.
    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/v1/announcements"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_test_app();

    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/health/live"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = create_test_app();

    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/health/live"))
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response should carry x-request-id");
    assert!(!request_id.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let app = create_test_app();

    let mut request = anonymous_request(Method::GET, "/api/health/live");
    request
        .headers_mut()
        .insert("x-request-id", "trace-abc-123".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-abc-123"
    );
}
