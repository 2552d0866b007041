//! Connection pool gauge sampling.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Samples database pool gauges on a short interval.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(10)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
