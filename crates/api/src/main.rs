use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use complaint_desk_api::app;
use complaint_desk_api::config::Config;
use complaint_desk_api::jobs::{AutoCloseJob, AutoPriorityJob, JobScheduler, PoolMetricsJob};
use complaint_desk_api::middleware::{init_metrics, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting Complaint Desk API v{}", env!("CARGO_PKG_VERSION"));

    // Install the Prometheus recorder before anything emits metrics
    init_metrics();

    // Create database pool
    let db_config = config.database.pool_config();
    let pool = persistence::db::create_pool(&db_config).await?;
    info!(database = %db_config.redacted_url(), "Database pool ready");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Build shared state
    let config = Arc::new(config);
    let state = app::build_state(config.clone(), pool.clone());

    // Schedule maintenance jobs
    let mut scheduler = JobScheduler::new();
    scheduler.register(AutoCloseJob::new(
        state.engine.clone(),
        config.workflow.auto_close_interval_mins,
    ));
    scheduler.register(AutoPriorityJob::new(
        state.engine.clone(),
        config.workflow.auto_priority_interval_mins,
    ));
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.start();

    // Build application
    let router = app::create_app(state);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop jobs after the listener drains
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
