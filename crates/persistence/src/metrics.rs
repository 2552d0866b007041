//! Database metrics collection.
//!
//! Repositories time every query through [`QueryTimer`]; pool gauges are
//! refreshed by a background job.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record one query duration under its operation name.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record connection pool gauges from the live pool counters.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one database operation and records it on `record()`.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_complaint_by_id");
/// let result = sqlx::query_as::<_, ComplaintEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    /// Create a new timer for the given query name.
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
