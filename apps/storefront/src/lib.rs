//! # Storefront Library
//!
//! Application layer of the storefront: shared state, the commands the
//! frontend invokes, and the background status monitor.
//!
//! ## Module Organization
//! ```text
//! storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── catalog.rs  ◄─── Snapshot of settings, menu and coupons
//! │   ├── cart.rs     ◄─── Cart session
//! │   ├── status.rs   ◄─── Open/closed status + monitor task
//! │   └── config.rs   ◄─── Configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── store.rs    ◄─── Status and menu
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── coupon.rs   ◄─── Coupons
//! │   └── checkout.rs ◄─── Order submission
//! ├── message.rs      ◄─── WhatsApp / clipboard text
//! └── error.rs        ◄─── API and startup errors
//! ```
//!
//! ## Runtime Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  main.rs ──► run()                                                      │
//! │               │                                                         │
//! │               ├── init_tracing()                                        │
//! │               ├── AppConfig::load()                                     │
//! │               ├── Storefront::new()  ── snapshot.json ──► CatalogState  │
//! │               │                                          CartState      │
//! │               │                                          StatusState    │
//! │               ├── StatusMonitor (tokio task, every status_poll_secs)    │
//! │               ├── reload snapshot.json every snapshot_reload_secs       │
//! │               └── on Ctrl-C, stop the monitor                           │
//! │                                                                         │
//! │  storefront_core does all pricing, cart and schedule logic; this crate  │
//! │  only holds state and turns results into responses.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod message;
pub mod state;

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use error::AppResult;
use state::{
    local_clock, AppConfig, CartState, CatalogState, Clock, StatusMonitor, StatusMonitorHandle,
    StatusState, StoreStatus,
};

/// Every piece of state a command may ask for.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub config: AppConfig,
    pub catalog: CatalogState,
    pub cart: CartState,
    pub status: StatusState,
}

impl Storefront {
    /// Loads the snapshot named in `config` and evaluates the initial status.
    pub fn new(config: AppConfig, clock: &Clock) -> AppResult<Self> {
        let catalog = CatalogState::load(&config.snapshot_path)?;
        let status = StatusState::new(StoreStatus::evaluate(&catalog.settings(), &clock()));

        Ok(Storefront {
            config,
            catalog,
            cart: CartState::new(),
            status,
        })
    }

    /// Re-reads the snapshot file and re-evaluates the status right away.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload_snapshot(&self, clock: &Clock) -> AppResult<StoreStatus> {
        self.catalog.reload(&self.config.snapshot_path)?;
        Ok(self.status.refresh(&self.catalog.settings(), &clock()))
    }

    /// Starts the background status monitor.
    pub fn spawn_monitor(&self, clock: Clock) -> StatusMonitorHandle {
        StatusMonitor::new(
            self.catalog.clone(),
            self.status.clone(),
            Duration::from_secs(self.config.status_poll_secs),
            clock,
        )
        .start()
    }
}

/// Runs the storefront until Ctrl-C.
///
/// ## Startup Sequence
/// 1. Initialize tracing (logging)
/// 2. Load configuration (file, then environment)
/// 3. Load the snapshot and evaluate the store status
/// 4. Start the status monitor
/// 5. Reload the snapshot periodically until shutdown
pub async fn run() -> AppResult<()> {
    init_tracing();

    info!("Starting storefront");

    let config = AppConfig::load(None)?;
    info!(
        snapshot = ?config.snapshot_path,
        poll_secs = config.status_poll_secs,
        "Configuration loaded"
    );

    let clock = local_clock();
    let storefront = Storefront::new(config, &clock)?;

    let status = storefront.status.current();
    let store_name = storefront.catalog.settings().store_name;
    info!(store = %store_name, is_open = status.is_open, message = %status.message, "Store ready");

    let monitor = storefront.spawn_monitor(clock.clone());

    let mut reload = tokio::time::interval(Duration::from_secs(storefront.config.snapshot_reload_secs));
    reload.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; the snapshot was just loaded
    reload.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
                }
                break;
            }
            _ = reload.tick() => {
                if let Err(e) = storefront.reload_snapshot(&clock) {
                    warn!(error = %e, "Snapshot reload failed, keeping the previous one");
                }
            }
        }
    }

    info!("Shutting down");
    monitor.shutdown().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_lib=trace` - Show trace for this crate only
/// - Default: INFO, DEBUG for the storefront crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,storefront_lib=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
