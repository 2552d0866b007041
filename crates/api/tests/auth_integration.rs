//! Integration tests for forwarded-identity handling.
//!
//! Identity arrives in `X-Actor-Id` and `X-Actor-Role` headers set by the
//! gateway. Every workflow endpoint rejects requests without a usable
//! actor before doing anything else.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    anonymous_request, create_test_app, parse_response_body, request_as, TestActor,
    ACTOR_ID_HEADER, ACTOR_ROLE_HEADER,
};
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_missing_identity_headers_unauthorized() {
    let app = create_test_app();

    let response = app
        .oneshot(anonymous_request(Method::GET, "/api/v1/complaints"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert!(body["message"].as_str().unwrap().contains("X-Actor-Id"));
}

#[tokio::test]
async fn test_missing_role_header_unauthorized() {
    let app = create_test_app();

    let mut request = anonymous_request(Method::GET, "/api/v1/complaints");
    request
        .headers_mut()
        .insert(ACTOR_ID_HEADER, Uuid::new_v4().to_string().parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("X-Actor-Role"));
}

#[tokio::test]
async fn test_malformed_actor_id_unauthorized() {
    let app = create_test_app();

    let mut request = anonymous_request(Method::GET, "/api/v1/notifications");
    request
        .headers_mut()
        .insert(ACTOR_ID_HEADER, "not-a-uuid".parse().unwrap());
    request
        .headers_mut()
        .insert(ACTOR_ROLE_HEADER, "customer".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_unauthorized() {
    let app = create_test_app();

    let mut request = anonymous_request(Method::GET, "/api/v1/complaints");
    request
        .headers_mut()
        .insert(ACTOR_ID_HEADER, Uuid::new_v4().to_string().parse().unwrap());
    request
        .headers_mut()
        .insert(ACTOR_ROLE_HEADER, "superuser".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_system_role_cannot_be_asserted() {
    let app = create_test_app();

    // The system role belongs to background jobs, not requests.
    let mut request = anonymous_request(Method::GET, "/api/v1/complaints");
    request
        .headers_mut()
        .insert(ACTOR_ID_HEADER, Uuid::new_v4().to_string().parse().unwrap());
    request
        .headers_mut()
        .insert(ACTOR_ROLE_HEADER, "system".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("system"));
}

#[tokio::test]
async fn test_identity_required_on_transaction_routes() {
    let app = create_test_app();

    for uri in [
        "/api/v1/transactions/recent",
        "/api/v1/transactions/export",
        "/api/v1/notifications/unread-count",
    ] {
        let response = app
            .clone()
            .oneshot(anonymous_request(Method::GET, uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_valid_identity_passes_extraction() {
    let app = create_test_app();

    // A customer is turned away from the staff audit feed with a role
    // error, not an identity error, proving the headers were accepted.
    let response = app
        .oneshot(request_as(
            Method::GET,
            "/api/v1/transactions/recent",
            &TestActor::customer(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
