//! Cron-based scheduler driving periodic sync
//!
//! Each periodic-sync registration becomes one named cron job that enqueues
//! a sync event on every firing. Uses `tokio-cron-scheduler`.

mod interval;

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub use interval::{interval_to_cron, schedules};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// Interval cannot be expressed as a cron schedule
    #[error("Unsupported interval: {0}")]
    UnsupportedInterval(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Firing statistics for one scheduled job
#[derive(Debug, Clone)]
pub struct TaskStats {
    /// Job name
    pub name: String,
    /// Cron expression the job runs on
    pub cron_expression: String,
    /// Firings that enqueued their event
    pub fired_count: u64,
    /// Firings that could not reach a worker
    pub failure_count: u64,
    /// Last firing time
    pub last_fired: Option<DateTime<Utc>>,
    /// Reason of the last failed firing
    pub last_error: Option<String>,
}

struct JobEntry {
    cron_expression: String,
    job_id: Uuid,
    fired: AtomicU64,
    failed: AtomicU64,
    last_fired: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
}

impl JobEntry {
    fn new(cron_expression: String, job_id: Uuid) -> Self {
        Self {
            cron_expression,
            job_id,
            fired: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            last_fired: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    fn record(&self, result: &Result<(), String>) {
        *self.last_fired.write() = Some(Utc::now());
        match result {
            Ok(()) => {
                self.fired.fetch_add(1, Ordering::Relaxed);
            },
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                *self.last_error.write() = Some(e.clone());
            },
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether to start the scheduler immediately
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Recurring periodic-sync firings
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    jobs: Arc<RwLock<HashMap<String, Arc<JobEntry>>>>,
    running: AtomicBool,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("jobs", &self.jobs.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a new scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let instance = Self {
            scheduler: AsyncMutex::new(JobScheduler::new().await?),
            jobs: Arc::new(RwLock::new(HashMap::new())),
            running: AtomicBool::new(false),
        };

        if config.auto_start {
            instance.scheduler.lock().await.start().await?;
            instance.running.store(true, Ordering::Relaxed);
        }

        info!(running = config.auto_start, "Task scheduler initialized");
        Ok(instance)
    }

    /// Stop the scheduler
    ///
    /// A stopped scheduler cannot be restarted; create a new one instead.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.swap(false, Ordering::Relaxed) {
            debug!("Scheduler already stopped");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        info!("Task scheduler stopped");
        Ok(())
    }

    /// Add a named cron job, replacing any job with the same name
    ///
    /// Cron expressions have 6 fields: sec min hour day month weekday.
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        cron_expression.parse::<cron::Schedule>().map_err(|e| {
            SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}"))
        })?;

        let previous = self.jobs.write().remove(name);
        if let Some(previous) = previous {
            self.scheduler.lock().await.remove(&previous.job_id).await?;
            debug!(task = %name, "Replacing existing job");
        }

        let job_name = name.to_string();
        let jobs = Arc::clone(&self.jobs);

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let name = job_name.clone();
            let entry = jobs.read().get(&name).cloned();
            let firing = task();

            Box::pin(async move {
                let result = firing.await;
                if let Some(entry) = &entry {
                    entry.record(&result);
                }
                match result {
                    Ok(()) => debug!(task = %name, "Job fired"),
                    Err(e) => error!(task = %name, error = %e, "Job firing failed"),
                }
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        let job_id = job.guid();
        self.scheduler.lock().await.add(job).await?;
        self.jobs.write().insert(
            name.to_string(),
            Arc::new(JobEntry::new(cron_expression.to_string(), job_id)),
        );

        info!(task = %name, cron = %cron_expression, "Job scheduled");
        Ok(())
    }

    /// Firing statistics for a job
    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.jobs.read().get(name).map(|entry| TaskStats {
            name: name.to_string(),
            cron_expression: entry.cron_expression.clone(),
            fired_count: entry.fired.load(Ordering::Relaxed),
            failure_count: entry.failed.load(Ordering::Relaxed),
            last_fired: *entry.last_fired.read(),
            last_error: entry.last_error.read().clone(),
        })
    }
}
