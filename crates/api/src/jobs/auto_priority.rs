//! Periodic priority escalation for aging complaints.

use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::services::WorkflowEngine;

/// Raises priorities on open complaints as they age past the cutoffs.
///
/// Listings also refresh priorities on read; this sweep keeps the stored
/// values honest for consumers that query the table directly.
pub struct AutoPriorityJob {
    engine: WorkflowEngine,
    interval_mins: u64,
}

impl AutoPriorityJob {
    pub fn new(engine: WorkflowEngine, interval_mins: u64) -> Self {
        Self {
            engine,
            interval_mins,
        }
    }
}

#[async_trait::async_trait]
impl Job for AutoPriorityJob {
    fn name(&self) -> &'static str {
        "auto_priority"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_mins)
    }

    async fn execute(&self) -> Result<(), String> {
        let escalated = self
            .engine
            .run_auto_priority()
            .await
            .map_err(|e| format!("Priority escalation sweep failed: {}", e))?;

        if escalated > 0 {
            info!(escalated, "Escalated complaint priorities");
        }
        Ok(())
    }
}
