//! # Catalog State
//!
//! Holds the current backend snapshot: store settings, catalog and coupons.
//!
//! ## Refresh Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshot.json ──► Snapshot rows ──► into_store() ──► StoreSnapshot     │
//! │                                           │                             │
//! │                                           └── skipped rows → warn!      │
//! │                                                                         │
//! │  Backend pushes a change ──► replace(new snapshot)                      │
//! │                              (whole value swapped, never patched)       │
//! │                                                                         │
//! │  Readers (commands, status monitor) take the read lock briefly and      │
//! │  clone what they need out of it.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use storefront_core::ingest::{SkippedRow, Snapshot, StoreSnapshot};
use storefront_core::StoreSettings;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Shared catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogState {
    snapshot: Arc<RwLock<StoreSnapshot>>,
}

impl CatalogState {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        CatalogState {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Reads and converts a snapshot file.
    ///
    /// Rows that fail validation are logged and left out.
    pub fn load(path: &Path) -> AppResult<Self> {
        let snapshot = read_snapshot(path)?;
        Ok(CatalogState::new(snapshot))
    }

    /// Re-reads `path` and swaps the snapshot in.
    pub fn reload(&self, path: &Path) -> AppResult<()> {
        let snapshot = read_snapshot(path)?;
        self.replace(snapshot);
        Ok(())
    }

    /// Swaps in a new snapshot.
    pub fn replace(&self, snapshot: StoreSnapshot) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
    }

    /// Executes a function with read access to the snapshot.
    pub fn with_snapshot<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StoreSnapshot) -> R,
    {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Copy of the current store settings.
    pub fn settings(&self) -> StoreSettings {
        self.with_snapshot(|s| s.settings.clone())
    }
}

fn read_snapshot(path: &Path) -> AppResult<StoreSnapshot> {
    let load_failed = |reason: String| AppError::SnapshotLoadFailed {
        path: path.display().to_string(),
        reason,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
    let rows: Snapshot = serde_json::from_str(&contents).map_err(|e| load_failed(e.to_string()))?;
    let (snapshot, skipped) = rows.into_store()?;

    log_skipped(&skipped);
    info!(
        ?path,
        categories = snapshot.catalog.categories.len(),
        products = snapshot.catalog.products.len(),
        groups = snapshot.catalog.groups.len(),
        coupons = snapshot.coupons.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

fn log_skipped(skipped: &[SkippedRow]) {
    for row in skipped {
        warn!(table = %row.table, id = %row.id, reason = %row.reason, "Skipping invalid row");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROWS: &str = r#"{
        "settings": { "store_name": "Sabor", "store_status": "open", "delivery_fee": 7 },
        "products": [
            { "id": "p1", "name": "Açaí 300ml", "price": 12.9, "category_id": "c1" },
            { "id": "p2", "name": "Sem preço", "category_id": "c1" }
        ]
    }"#;

    fn write_rows(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_skips_invalid_rows() {
        let file = write_rows(ROWS);
        let state = CatalogState::load(file.path()).unwrap();

        state.with_snapshot(|s| {
            assert_eq!(s.catalog.products.len(), 1);
            assert_eq!(s.catalog.products[0].price.cents(), 1290);
        });
        assert_eq!(state.settings().delivery_fee.cents(), 700);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogState::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AppError::SnapshotLoadFailed { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let file = write_rows("{ not json");
        assert!(CatalogState::load(file.path()).is_err());
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let file = write_rows(ROWS);
        let state = CatalogState::load(file.path()).unwrap();
        let shared = state.clone();

        let other = write_rows(r#"{ "settings": { "store_name": "Outra", "store_status": "closed" } }"#);
        state.reload(other.path()).unwrap();

        // Clones share the same snapshot
        assert_eq!(shared.settings().store_name, "Outra");
        shared.with_snapshot(|s| assert!(s.catalog.products.is_empty()));
    }
}
