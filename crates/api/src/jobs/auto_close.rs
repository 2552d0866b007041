//! Auto-close sweep for replied complaints the customer abandoned.

use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::services::WorkflowEngine;

/// Closes complaints that sat in `Replied` past the grace period.
pub struct AutoCloseJob {
    engine: WorkflowEngine,
    interval_mins: u64,
}

impl AutoCloseJob {
    pub fn new(engine: WorkflowEngine, interval_mins: u64) -> Self {
        Self {
            engine,
            interval_mins,
        }
    }
}

#[async_trait::async_trait]
impl Job for AutoCloseJob {
    fn name(&self) -> &'static str {
        "auto_close"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_mins)
    }

    async fn execute(&self) -> Result<(), String> {
        let closed = self
            .engine
            .run_auto_close()
            .await
            .map_err(|e| format!("Auto-close sweep failed: {}", e))?;

        if closed > 0 {
            info!(closed, "Auto-closed stale complaints");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_comes_from_config() {
        let freq = JobFrequency::Minutes(60);
        assert_eq!(freq.period().as_secs(), 3600);
    }
}
