//! Background job scheduling infrastructure.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // Hourly is available for future jobs
pub enum JobFrequency {
    /// Run every N seconds.
    Seconds(u64),
    /// Run every N minutes.
    Minutes(u64),
    /// Run every hour.
    Hourly,
}

impl JobFrequency {
    /// Duration between two executions.
    pub fn period(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(*mins * 60),
            JobFrequency::Hourly => Duration::from_secs(3600),
        }
    }
}

/// A recurring background task.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// How often the job runs.
    fn frequency(&self) -> JobFrequency;

    /// Run one iteration. Failures are logged and the schedule continues.
    async fn execute(&self) -> Result<(), String>;
}

/// Runs registered jobs on their intervals until shutdown is signalled.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Register a job. Has no effect until `start` is called.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        info!("Starting job scheduler with {} jobs", self.jobs.len());

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let frequency = job.frequency();
                let mut interval = tokio::time::interval(frequency.period());

                // The first tick of a tokio interval fires immediately;
                // skip it so the first run happens one period after startup.
                interval.tick().await;

                info!(job = name, frequency = ?frequency, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let start = std::time::Instant::now();
                            match job.execute().await {
                                Ok(()) => {
                                    info!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis(),
                                        "Job completed"
                                    );
                                }
                                Err(e) => {
                                    error!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis(),
                                        error = %e,
                                        "Job failed"
                                    );
                                }
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Signal all job tasks to stop. Returns immediately.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all job tasks to finish, up to `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, drain).await {
            Ok(()) => info!("All jobs stopped"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
