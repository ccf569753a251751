//! # Store Status
//!
//! The published open/closed state and the background task that keeps it
//! current.
//!
//! ## Monitor Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   every status_poll_secs (first tick immediately)                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   settings = CatalogState::settings()   (latest snapshot)               │
//! │   now      = clock()                    (store-local wall time)         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   StoreStatus::evaluate(settings, now)                                  │
//! │        │                                                                │
//! │        ├── unchanged ──► nothing published                              │
//! │        └── changed ────► watch channel updated, info! logged            │
//! │                                                                         │
//! │   Commands read StatusState::is_open() instead of evaluating the        │
//! │   schedule themselves, so the whole app agrees on one answer.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::Serialize;
use storefront_core::{StoreSettings, StoreStatusMode};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::CatalogState;

/// What the storefront shows in its header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub is_open: bool,
    pub mode: StoreStatusMode,
    /// Configured open or closed banner text.
    pub message: String,
}

impl StoreStatus {
    /// Evaluates `settings` at `now`.
    pub fn evaluate<T>(settings: &StoreSettings, now: &T) -> Self
    where
        T: Datelike + Timelike,
    {
        let is_open = settings.is_open_at(now);
        StoreStatus {
            is_open,
            mode: settings.store_status,
            message: if is_open {
                settings.open_message.clone()
            } else {
                settings.closed_message.clone()
            },
        }
    }
}

/// Shared, watchable store status.
#[derive(Debug, Clone)]
pub struct StatusState {
    tx: Arc<watch::Sender<StoreStatus>>,
}

impl StatusState {
    pub fn new(initial: StoreStatus) -> Self {
        let (tx, _) = watch::channel(initial);
        StatusState { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> StoreStatus {
        self.tx.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.tx.borrow().is_open
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.tx.subscribe()
    }

    /// Publishes `status` if it differs from the current one.
    ///
    /// Returns whether anything changed.
    pub fn publish(&self, status: StoreStatus) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            info!(
                is_open = status.is_open,
                mode = %status.mode,
                message = %status.message,
                "Store status changed"
            );
            *current = status;
            true
        })
    }

    /// Re-evaluates and publishes.
    pub fn refresh<T>(&self, settings: &StoreSettings, now: &T) -> StoreStatus
    where
        T: Datelike + Timelike,
    {
        let status = StoreStatus::evaluate(settings, now);
        self.publish(status.clone());
        status
    }
}

// =============================================================================
// Monitor
// =============================================================================

/// Source of the store-local wall-clock time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// The machine's local time.
pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Periodically re-evaluates the store status.
pub struct StatusMonitor {
    catalog: CatalogState,
    status: StatusState,
    period: Duration,
    clock: Clock,
}

/// Handle to a running [`StatusMonitor`].
pub struct StatusMonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl StatusMonitorHandle {
    /// Stops the monitor and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

impl StatusMonitor {
    pub fn new(catalog: CatalogState, status: StatusState, period: Duration, clock: Clock) -> Self {
        StatusMonitor {
            catalog,
            status,
            period,
            clock,
        }
    }

    /// Spawns the monitor loop.
    pub fn start(self) -> StatusMonitorHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));
        StatusMonitorHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(period_secs = self.period.as_secs(), "Store status monitor started");

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let settings = self.catalog.settings();
                    let now = (self.clock)();
                    let status = self.status.refresh(&settings, &now);
                    debug!(%now, is_open = status.is_open, "Store status checked");
                }
                _ = shutdown_rx.recv() => {
                    info!("Store status monitor shutting down");
                    break;
                }
            }
        }
    }
}
