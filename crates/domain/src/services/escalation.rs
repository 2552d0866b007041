//! Time-based priority escalation.
//!
//! Priority is a pure function of a complaint's age. The stored value acts
//! as a floor: escalation only ever raises it, so a priority set by staff is
//! never downgraded and re-running the policy with no elapsed time is a
//! no-op.

use chrono::{DateTime, Duration, Utc};

use crate::models::ComplaintPriority;

/// Escalation thresholds and the baseline for fresh complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    /// Priority for complaints younger than `high_after`.
    pub baseline: ComplaintPriority,
    /// Age at which priority becomes at least High.
    pub high_after: Duration,
    /// Age at which priority becomes Critical.
    pub critical_after: Duration,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            baseline: ComplaintPriority::Medium,
            high_after: Duration::hours(24),
            critical_after: Duration::hours(48),
        }
    }
}

impl EscalationPolicy {
    /// Default thresholds with a custom baseline.
    pub fn with_baseline(baseline: ComplaintPriority) -> Self {
        Self {
            baseline,
            ..Self::default()
        }
    }

    /// Priority derived purely from age.
    pub fn derived(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> ComplaintPriority {
        let age = now - created_at;
        if age >= self.critical_after {
            ComplaintPriority::Critical
        } else if age >= self.high_after {
            ComplaintPriority::High
        } else {
            self.baseline
        }
    }

    /// Escalated priority: the age-derived value, but never below the
    /// currently stored one.
    pub fn escalate(
        &self,
        current: ComplaintPriority,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ComplaintPriority {
        self.derived(created_at, now).max(current)
    }
}
