//! Background job scheduler and job implementations.

mod auto_close;
mod auto_priority;
mod pool_metrics;
mod scheduler;

pub use auto_close::AutoCloseJob;
pub use auto_priority::AutoPriorityJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
