//! # Item Configurator
//!
//! Turns one product into one cart line.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Browsing ──start()──┬── no active group attached ──► Direct(CartItem)  │
//! │                      │                                                  │
//! │                      └── otherwise ──► Configuring                      │
//! │                                          │  adjust / set_quantity /     │
//! │                                          │  set_note                    │
//! │                                          ▼                              │
//! │                                      confirm()                          │
//! │                                          │                              │
//! │                   every group valid? ────┼── no ──► Err(self), keep     │
//! │                                          │          editing             │
//! │                                          └── yes ─► Ok(CartItem)        │
//! │                                                     (price frozen)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::catalog::Catalog;
use crate::money::Money;
use crate::pricing::{adjust_option, compute_unit_price, validate_selection};
use crate::types::{CartItem, Product, ProductGroup, SelectedOptions};
use crate::MAX_ITEM_QUANTITY;

/// Outcome of opening a product.
#[derive(Debug, Clone)]
pub enum ConfigStart {
    /// Nothing to choose: the line is ready at the product price.
    Direct(CartItem),
    /// The customer has to pick options first.
    Configuring(ItemConfigurator),
}

/// In-progress option selection for one product.
#[derive(Debug, Clone)]
pub struct ItemConfigurator {
    product: Product,
    groups: Vec<ProductGroup>,
    selected: SelectedOptions,
    quantity: i64,
    note: String,
}

impl ItemConfigurator {
    /// Opens `product` against the current catalog.
    pub fn start(product: &Product, catalog: &Catalog) -> ConfigStart {
        let groups = catalog.attached_groups(product);
        if groups.is_empty() {
            return ConfigStart::Direct(CartItem::plain(product.clone()));
        }

        ConfigStart::Configuring(ItemConfigurator {
            product: product.clone(),
            groups,
            selected: SelectedOptions::new(),
            quantity: 1,
            note: String::new(),
        })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Groups shown in the modal, active options only.
    pub fn groups(&self) -> &[ProductGroup] {
        &self.groups
    }

    pub fn selected(&self) -> &SelectedOptions {
        &self.selected
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Applies `delta` to an option. Returns whether the selection changed.
    pub fn adjust(&mut self, group_id: &str, option_id: &str, delta: i64) -> bool {
        let Some(group) = self.groups.iter().find(|g| g.id == group_id) else {
            return false;
        };
        let next = adjust_option(group, &self.selected, option_id, delta);
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    /// Sets how many units the line will hold, kept within `1..=MAX_ITEM_QUANTITY`.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.clamp(1, MAX_ITEM_QUANTITY);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Unit price with the current selection.
    pub fn unit_price(&self) -> Money {
        compute_unit_price(&self.product, &self.selected, &self.groups)
    }

    /// `unit_price × quantity`, as shown on the confirm button.
    pub fn total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Groups whose selection is outside `min..=max`.
    pub fn unsatisfied_groups(&self) -> Vec<&ProductGroup> {
        self.groups
            .iter()
            .filter(|g| !validate_selection(g, &self.selected))
            .collect()
    }

    pub fn can_confirm(&self) -> bool {
        self.groups.iter().all(|g| validate_selection(g, &self.selected))
    }

    /// Freezes the configuration into a cart line, or hands the
    /// configurator back when a group is not satisfied yet.
    pub fn confirm(self) -> Result<CartItem, Self> {
        if !self.can_confirm() {
            return Err(self);
        }

        let unit_price = self.unit_price();
        let note = self.note.trim();
        let note = (!note.is_empty()).then(|| note.to_string());
        Ok(CartItem::new(
            self.product,
            self.quantity,
            self.selected,
            note,
            unit_price,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
