//! In-process worker host
//!
//! Plays the platform's part for the worker: it spawns one worker per
//! registration, runs install and activation, then feeds triggers to the
//! dispatcher from an ordered channel. Coordinate updates are applied in
//! channel order; every other trigger runs as its own task, so slow fetches
//! may overlap.
//!
//! The host also implements [`WorkerContainerPort`], which is what the
//! foreground bridge talks to.

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use application::error::ApplicationError;
use application::ports::{
    CacheStoragePort, ClientsPort, NotificationPort, WeatherPort, WorkerContainerPort,
    WorkerRegistration,
};
use application::{CoordinateStore, DispatcherConfig, TriggerDispatcher, WorkerState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Coordinates, PushPayload, Trigger, WorkerMessage};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinHandle, JoinSet},
};
use tracing::{debug, error, info, instrument, warn};

use crate::scheduler::{SchedulerError, TaskScheduler, interval_to_cron};

/// Default capacity of the worker event channel
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Platform surfaces handed to every worker instance
#[derive(Clone)]
pub struct WorkerPlatform {
    /// Forecast source
    pub weather: Arc<dyn WeatherPort>,
    /// Notification surface
    pub notifications: Arc<dyn NotificationPort>,
    /// Foreground pages
    pub clients: Arc<dyn ClientsPort>,
    /// Cache namespaces
    pub caches: Arc<dyn CacheStoragePort>,
}

impl fmt::Debug for WorkerPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPlatform").finish_non_exhaustive()
    }
}

/// Worker host configuration
#[derive(Debug, Clone)]
pub struct WorkerHostConfig {
    /// Settings passed to each worker's dispatcher
    pub dispatcher: DispatcherConfig,
    /// Capacity of the worker event channel
    pub event_buffer_size: usize,
}

impl Default for WorkerHostConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

/// Snapshot of the host for health and status reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerStatus {
    /// Whether a worker is registered
    pub registered: bool,
    /// Registration scope
    pub scope: Option<String>,
    /// Lifecycle state of the registered worker
    pub state: Option<WorkerState>,
    /// Coordinates the worker currently holds
    pub coordinates: Option<Coordinates>,
    /// Registered periodic sync tags
    pub periodic_syncs: Vec<String>,
}

#[derive(Clone)]
struct ActiveWorker {
    scope: String,
    sender: mpsc::Sender<Trigger>,
    state: watch::Receiver<WorkerState>,
    dispatcher: Arc<TriggerDispatcher>,
}

impl ActiveWorker {
    fn is_ready(&self) -> bool {
        *self.state.borrow() == WorkerState::Ready
    }
}

struct WorkerSlot {
    worker: ActiveWorker,
    task: JoinHandle<()>,
}

/// Host platform for the weather worker
pub struct WorkerHost {
    platform: WorkerPlatform,
    config: WorkerHostConfig,
    scheduler: Option<Arc<TaskScheduler>>,
    slot: Arc<RwLock<Option<WorkerSlot>>>,
    periodic_syncs: RwLock<BTreeMap<String, Duration>>,
    clock: fn() -> DateTime<Utc>,
}

impl fmt::Debug for WorkerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHost")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl WorkerHost {
    /// Create a host with no worker registered
    #[must_use]
    pub fn new(platform: WorkerPlatform, config: WorkerHostConfig) -> Self {
        Self {
            platform,
            config,
            scheduler: None,
            slot: Arc::new(RwLock::new(None)),
            periodic_syncs: RwLock::new(BTreeMap::new()),
            clock: Utc::now,
        }
    }

    /// Enable periodic sync backed by the given scheduler
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Arc<TaskScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Replace the time source handed to each worker
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn current(&self) -> Option<ActiveWorker> {
        self.slot.read().as_ref().map(|slot| slot.worker.clone())
    }

    fn registration(&self, worker: &ActiveWorker) -> WorkerRegistration {
        WorkerRegistration {
            scope: worker.scope.clone(),
            active: worker.is_ready(),
            periodic_sync_supported: self.scheduler.is_some(),
        }
    }

    fn spawn_worker(&self, scope: &str) -> (ActiveWorker, JoinHandle<()>) {
        let store = Arc::new(CoordinateStore::new());
        let dispatcher = Arc::new(
            TriggerDispatcher::new(
                store,
                Arc::clone(&self.platform.weather),
                Arc::clone(&self.platform.notifications),
                Arc::clone(&self.platform.clients),
                Arc::clone(&self.platform.caches),
                self.config.dispatcher.clone(),
            )
            .with_clock(self.clock),
        );
        let (sender, receiver) = mpsc::channel(self.config.event_buffer_size.max(1));
        let (state_tx, state_rx) = watch::channel(WorkerState::Installing);

        let task = tokio::spawn(run_worker(Arc::clone(&dispatcher), receiver, state_tx));

        let worker = ActiveWorker {
            scope: scope.to_string(),
            sender,
            state: state_rx,
            dispatcher,
        };
        (worker, task)
    }

    /// Queue a trigger for the registered worker
    ///
    /// Triggers queued during activation are handled once it completes.
    pub async fn fire(&self, trigger: Trigger) -> Result<(), ApplicationError> {
        let worker = self
            .current()
            .ok_or_else(|| ApplicationError::NotReady("No worker registered".to_string()))?;
        debug!(kind = trigger.kind(), "Queueing trigger");
        worker
            .sender
            .send(trigger)
            .await
            .map_err(|_| ApplicationError::NotReady("Worker stopped".to_string()))
    }

    /// Deliver a push message
    pub async fn push(&self, payload: PushPayload) -> Result<(), ApplicationError> {
        self.fire(Trigger::Push(payload)).await
    }

    /// Fire a periodic sync event with the given tag
    pub async fn periodic_sync(&self, tag: impl Into<String>) -> Result<(), ApplicationError> {
        self.fire(Trigger::PeriodicSync { tag: tag.into() }).await
    }

    /// Report a click on the notification with the given tag
    pub async fn notification_click(&self, tag: impl Into<String>) -> Result<(), ApplicationError> {
        self.fire(Trigger::NotificationClick { tag: tag.into() })
            .await
    }

    async fn deliver(&self, message: WorkerMessage) -> Result<(), ApplicationError> {
        let trigger = Trigger::try_from(message).map_err(|e| {
            warn!(error = %e, "Rejected worker message");
            ApplicationError::from(e)
        })?;
        self.fire(trigger).await
    }

    /// Kill the worker without draining in-flight triggers
    ///
    /// Its coordinates are lost; the next registration starts empty.
    pub fn terminate(&self) -> bool {
        let Some(slot) = self.slot.write().take() else {
            return false;
        };
        slot.task.abort();
        info!(scope = %slot.worker.scope, "Worker terminated");
        true
    }

    /// Stop accepting triggers and wait for in-flight ones to finish
    pub async fn shutdown(&self) {
        let slot = self.slot.write().take();
        let Some(WorkerSlot { worker, task }) = slot else {
            return;
        };
        let scope = worker.scope.clone();
        drop(worker);

        if let Err(e) = task.await {
            log_join_error(&e);
        }
        info!(%scope, "Worker shut down");
    }

    /// Current host status
    #[must_use]
    pub fn status(&self) -> WorkerStatus {
        let periodic_syncs = self.periodic_syncs.read().keys().cloned().collect();
        match self.current() {
            Some(worker) => WorkerStatus {
                registered: true,
                state: Some(*worker.state.borrow()),
                coordinates: worker.dispatcher.store().get(),
                scope: Some(worker.scope),
                periodic_syncs,
            },
            None => WorkerStatus {
                registered: false,
                scope: None,
                state: None,
                coordinates: None,
                periodic_syncs,
            },
        }
    }

    /// Whether the registered worker has finished activation
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current().is_some_and(|worker| worker.is_ready())
    }
}

fn periodic_task_name(tag: &str) -> String {
    format!("periodic-sync:{tag}")
}

fn log_join_error(err: &JoinError) {
    if err.is_cancelled() {
        debug!("Worker task cancelled");
    } else {
        error!(error = %err, "Worker task panicked");
    }
}

async fn run_worker(
    dispatcher: Arc<TriggerDispatcher>,
    mut receiver: mpsc::Receiver<Trigger>,
    state: watch::Sender<WorkerState>,
) {
    dispatcher.install();
    state.send_replace(WorkerState::Activating);
    dispatcher.activate().await;
    state.send_replace(dispatcher.state());

    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = result {
                    log_join_error(&e);
                }
            }
            next = receiver.recv() => match next {
                Some(Trigger::SetCoordinates(coordinates)) => {
                    dispatcher.dispatch(Trigger::SetCoordinates(coordinates)).await;
                }
                Some(trigger) => {
                    let dispatcher = Arc::clone(&dispatcher);
                    in_flight.spawn(async move { dispatcher.dispatch(trigger).await });
                }
                None => break,
            },
        }
    }

    while let Some(result) = in_flight.join_next().await {
        if let Err(e) = result {
            log_join_error(&e);
        }
    }
    debug!("Worker event loop stopped");
}

#[async_trait]
impl WorkerContainerPort for WorkerHost {
    fn is_supported(&self) -> bool {
        true
    }

    #[instrument(skip(self))]
    async fn register(&self, scope: &str) -> Result<WorkerRegistration, ApplicationError> {
        let mut slot = self.slot.write();

        if let Some(existing) = slot.as_ref() {
            if existing.worker.scope == scope {
                debug!("Worker already registered");
                return Ok(self.registration(&existing.worker));
            }
            info!(old_scope = %existing.worker.scope, "Replacing worker for new scope");
            existing.task.abort();
        }

        let (worker, task) = self.spawn_worker(scope);
        let registration = self.registration(&worker);
        *slot = Some(WorkerSlot { worker, task });

        info!("Worker registered");
        Ok(registration)
    }

    async fn ready(&self) -> Result<WorkerRegistration, ApplicationError> {
        let worker = self
            .current()
            .ok_or_else(|| ApplicationError::NotReady("No worker registered".to_string()))?;

        let mut state = worker.state.clone();
        state
            .wait_for(|s| *s == WorkerState::Ready)
            .await
            .map_err(|_| {
                ApplicationError::NotReady("Worker stopped before activation".to_string())
            })?;

        Ok(self.registration(&worker))
    }

    fn has_controller(&self) -> bool {
        self.is_ready()
    }

    async fn post_to_controller(&self, message: WorkerMessage) -> Result<(), ApplicationError> {
        if !self.has_controller() {
            return Err(ApplicationError::NotReady(
                "No controlling worker".to_string(),
            ));
        }
        self.deliver(message).await
    }

    async fn post_to_active(&self, message: WorkerMessage) -> Result<(), ApplicationError> {
        if !self.is_ready() {
            return Err(ApplicationError::NotReady("No active worker".to_string()));
        }
        self.deliver(message).await
    }

    #[instrument(skip(self))]
    async fn register_periodic_sync(
        &self,
        tag: &str,
        min_interval: Duration,
    ) -> Result<(), ApplicationError> {
        let scheduler = self.scheduler.as_ref().ok_or_else(|| {
            ApplicationError::UnsupportedPlatform("Periodic sync is not available".to_string())
        })?;

        let cron = interval_to_cron(min_interval).map_err(|e| match e {
            SchedulerError::UnsupportedInterval(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Internal(other.to_string()),
        })?;

        let slot = Arc::clone(&self.slot);
        let sync_tag = tag.to_string();
        scheduler
            .add_task(&periodic_task_name(tag), &cron, move || {
                let sender = slot
                    .read()
                    .as_ref()
                    .map(|slot| slot.worker.sender.clone());
                let tag = sync_tag.clone();
                async move {
                    let sender = sender.ok_or_else(|| "no worker registered".to_string())?;
                    sender
                        .send(Trigger::PeriodicSync { tag })
                        .await
                        .map_err(|_| "worker stopped".to_string())
                }
            })
            .await
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

        self.periodic_syncs
            .write()
            .insert(tag.to_string(), min_interval);
        info!(%cron, "Periodic sync registered");
        Ok(())
    }
}
