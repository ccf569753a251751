//! # Cart State
//!
//! Holds the customer's cart session.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Frontend Action          Command                 Cart State Change     │
//! │  ───────────────          ───────                 ─────────────────     │
//! │                                                                         │
//! │  Tap product ────────────► add_to_cart() ───────► new line (or modal)  │
//! │                                                                         │
//! │  Confirm modal ──────────► add_configured_item()► new line             │
//! │                                                                         │
//! │  +/- on a line ──────────► update_cart_item() ──► qty = n (0 removes)  │
//! │                                                                         │
//! │  Apply code ─────────────► apply_coupon() ──────► coupon slot          │
//! │                                                                         │
//! │  Send order ─────────────► checkout() ──────────► cleared              │
//! │                                                                         │
//! │  NOTE: All write operations acquire the Mutex lock exclusively.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use storefront_core::cart::Cart;

/// Shared cart session.
///
/// A poisoned lock is recovered rather than propagated: every cart
/// operation leaves the cart consistent before it can panic.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = cart_state.with_cart(|cart| cart.item_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(item))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CartItem, Money, Product};

    fn product() -> Product {
        Product {
            id: "p1".into(),
            name: "Açaí 300ml".into(),
            description: None,
            price: Money::from_cents(1290),
            image: None,
            category_id: "c1".into(),
            group_ids: vec![],
            display_order: None,
            active: true,
        }
    }

    #[test]
    fn test_clones_share_one_cart() {
        let state = CartState::new();
        let other = state.clone();

        state
            .with_cart_mut(|c| c.add_item(CartItem::plain(product())))
            .unwrap();

        assert_eq!(other.with_cart(|c| c.item_count()), 1);
    }

    #[test]
    fn test_recovers_from_poisoned_lock() {
        let state = CartState::new();
        let poisoner = state.clone();

        let _ = std::thread::spawn(move || {
            poisoner.with_cart_mut(|_| panic!("boom"));
        })
        .join();

        state
            .with_cart_mut(|c| c.add_item(CartItem::plain(product())))
            .unwrap();
        assert_eq!(state.with_cart(|c| c.item_count()), 1);
    }
}
