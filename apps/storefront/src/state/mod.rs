//! # State Module
//!
//! Shared application state handed to commands.
//!
//! ## Multiple State Types
//! Each command takes only the state it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ CatalogState │  │  CartState   │  │ StatusState  │  │ AppConfig  │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  Arc<RwLock< │  │  Arc<Mutex<  │  │  watch       │  │  currency  │  │
//! │  │  StoreSnap-  │  │    Cart      │  │  channel of  │  │  format,   │  │
//! │  │  shot>>      │  │  >>          │  │  StoreStatus │  │  polling   │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CatalogState: replaced wholesale under a write lock                 │
//! │  • CartState: exclusive access per operation                           │
//! │  • StatusState: written only by the status monitor                     │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod status;

pub use cart::CartState;
pub use catalog::CatalogState;
pub use config::AppConfig;
pub use status::{local_clock, Clock, StatusMonitor, StatusMonitorHandle, StatusState, StoreStatus};
