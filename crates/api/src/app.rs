use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{announcements, complaints, health, notifications, transactions};
use crate::services::{EmailService, NotificationDispatcher, WorkflowEngine};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub engine: WorkflowEngine,
    pub dispatcher: NotificationDispatcher,
}

/// Wire the services once; the router and the job scheduler share them.
pub fn build_state(config: Arc<Config>, pool: PgPool) -> AppState {
    let email = EmailService::new(config.email.clone());
    let dispatcher = NotificationDispatcher::new(pool.clone(), email);
    let engine = WorkflowEngine::new(pool.clone(), dispatcher.clone(), &config.workflow);

    AppState {
        pool,
        config,
        engine,
        dispatcher,
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Workflow routes. Identity arrives in the X-Actor-* headers set by the
    // authenticating proxy; the extractor rejects requests without them.
    let api_routes = Router::new()
        .route(
            "/api/v1/complaints",
            post(complaints::submit_complaint).get(complaints::list_complaints),
        )
        .route(
            "/api/v1/complaints/:complaint_id",
            get(complaints::get_complaint),
        )
        .route(
            "/api/v1/complaints/:complaint_id/reply",
            post(complaints::reply),
        )
        .route(
            "/api/v1/complaints/:complaint_id/request-info",
            post(complaints::request_more_info),
        )
        .route(
            "/api/v1/complaints/:complaint_id/additional-info",
            post(complaints::provide_additional_info),
        )
        .route(
            "/api/v1/complaints/:complaint_id/resolve",
            post(complaints::approve_resolution),
        )
        .route(
            "/api/v1/complaints/:complaint_id/feedback",
            post(complaints::submit_feedback),
        )
        .route(
            "/api/v1/complaints/:complaint_id/assign",
            post(complaints::assign_complaint),
        )
        .route(
            "/api/v1/complaints/:complaint_id/transactions",
            get(complaints::get_history),
        )
        .route(
            "/api/v1/transactions/recent",
            get(transactions::recent_transactions),
        )
        .route(
            "/api/v1/transactions/export",
            get(transactions::export_transactions),
        )
        .route(
            "/api/v1/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/v1/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/v1/notifications/:id/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/v1/announcements",
            post(announcements::create_announcement),
        );

    // Public routes (no actor headers required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
