//! # Cart
//!
//! The customer's cart session: lines plus at most one applied coupon.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action                  Operation                 Effect               │
//! │  ──────                  ─────────                 ──────               │
//! │  Confirm product    ───► add_item(item)       ───► new line             │
//! │  +/- on a line      ───► update_quantity      ───► qty = n (0 removes)  │
//! │  Edit observation   ───► update_note          ───► note = text          │
//! │  Trash icon         ───► remove_item          ───► line gone            │
//! │  Apply code         ───► apply_coupon         ───► slot replaced        │
//! │  Order sent         ───► clear                ───► empty, no coupon     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `cart_id`, not by product: the same product with
//!   different options is two lines.
//! - Every line has quantity ≥ 1.
//! - Operations addressing an unknown `cart_id` are no-ops.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::coupon;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{price_cart, PriceBreakdown};
use crate::types::{CartItem, Coupon};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The cart session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub applied_coupon: Option<Coupon>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Appends a line.
    ///
    /// ## Returns
    /// - `Err(CartTooLarge)` when the cart already holds `MAX_CART_ITEMS` lines
    /// - `Err(QuantityTooLarge)` when the line quantity is above `MAX_ITEM_QUANTITY`
    pub fn add_item(&mut self, item: CartItem) -> CoreResult<()> {
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let mut item = item;
        item.quantity = item.quantity.max(1);
        self.items.push(item);
        Ok(())
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, cart_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(cart_id);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.cart_id == cart_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Sets or clears (empty text) a line's note.
    pub fn update_note(&mut self, cart_id: &str, note: &str) {
        if let Some(item) = self.items.iter_mut().find(|i| i.cart_id == cart_id) {
            let note = note.trim();
            item.note = (!note.is_empty()).then(|| note.to_string());
        }
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove_item(&mut self, cart_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.cart_id != cart_id);
        self.items.len() != initial_len
    }

    /// Empties the cart and drops the applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
    }

    /// Looks `code` up and, when eligible, makes it the applied coupon,
    /// replacing any previous one.
    pub fn apply_coupon(&mut self, coupons: &[Coupon], code: &str) -> CoreResult<&Coupon> {
        let found = coupon::apply_coupon(&self.items, coupons, code)?;
        Ok(&*self.applied_coupon.insert(found))
    }

    /// Drops the applied coupon.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.applied_coupon.take()
    }

    /// Returns the line with `cart_id`.
    pub fn item(&self, cart_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.cart_id == cart_id)
    }

    /// Returns the number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subtotal, discount, fee and total. Pass the delivery fee only when
    /// delivery is the chosen method.
    pub fn totals(&self, delivery_fee: Option<Money>) -> PriceBreakdown {
        price_cart(&self.items, self.applied_coupon.as_ref(), delivery_fee)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
