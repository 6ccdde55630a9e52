//! Fixed-interval scheduler
//!
//! Runs a job every `interval` until a [`CancellationToken`] fires. Runs are
//! strictly sequential: a tick that comes due while a run is still going is
//! delayed until it finishes, never queued up or run concurrently.

use crate::error::Result;
use crate::task::MaintenanceTask;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest interval the scheduler will tick at
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Work the scheduler can run
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Performs one run
    async fn run(&self) -> Result<()>;
}

#[async_trait]
impl ScheduledJob for MaintenanceTask {
    fn name(&self) -> &str {
        "maintenance"
    }

    async fn run(&self) -> Result<()> {
        self.run_once().await.map(|_| ())
    }
}

/// Counters returned when the scheduler stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed runs, successful or not
    pub runs: u64,
    /// Runs that returned an error
    pub failures: u64,
}

impl SchedulerStats {
    /// Runs that completed without error
    pub fn successes(&self) -> u64 {
        self.runs - self.failures
    }
}

/// Runs a job at a fixed interval
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler; intervals below [`MIN_INTERVAL`] are raised to it
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Creates a scheduler ticking every `minutes` minutes
    pub fn every_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// The tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `job` until `token` is cancelled.
    ///
    /// The first run happens one interval after the call. Failed runs are
    /// logged and counted; the loop carries on with the next tick. A run in
    /// progress when the token fires is allowed to finish.
    pub async fn run<J>(&self, job: &J, token: CancellationToken) -> SchedulerStats
    where
        J: ScheduledJob + ?Sized,
    {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            job = job.name(),
            interval_secs = self.interval.as_secs(),
            "scheduler started"
        );

        let mut stats = SchedulerStats::default();
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let started = Instant::now();
            let outcome = job.run().await;
            stats.runs += 1;

            match outcome {
                Ok(()) => tracing::debug!(
                    job = job.name(),
                    run = stats.runs,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "scheduled run finished"
                ),
                Err(e) => {
                    stats.failures += 1;
                    tracing::error!(job = job.name(), run = stats.runs, error = %e, "scheduled run failed");
                }
            }
        }

        tracing::info!(
            job = job.name(),
            runs = stats.runs,
            failures = stats.failures,
            "scheduler stopped"
        );
        stats
    }

    /// Runs `job` on a background task until `token` is cancelled
    pub fn spawn<J>(self, job: Arc<J>, token: CancellationToken) -> JoinHandle<SchedulerStats>
    where
        J: ScheduledJob + ?Sized + 'static,
    {
        tokio::spawn(async move { self.run(job.as_ref(), token).await })
    }
}
