//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It decides whether the
//! store is open and what the customer pays, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Backend-as-a-service (external)                    │   │
//! │  │    settings, categories, products, groups, coupons, orders      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshot rows                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/storefront                              │   │
//! │  │    config, catalog state, cart session, status monitor,         │   │
//! │  │    add_to_cart, apply_coupon, checkout, ...                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ schedule  │  │  pricing  │  │   cart    │  │  ingest   │  │   │
//! │  │   │  is_open  │  │  coupon   │  │configurat.│  │ validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductGroup, CartItem, Coupon, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`schedule`] - Open/closed evaluation, overnight windows included
//! - [`pricing`] - Option selection rules, unit price, totals
//! - [`coupon`] - Coupon lookup and eligibility
//! - [`cart`] - The customer's cart session
//! - [`configurator`] - Product → cart line flow
//! - [`catalog`] - Read-only catalog snapshot
//! - [`ingest`] - Backend rows → domain types
//! - [`validation`] - Field-level validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the current time is always passed in
//! 2. **Integer Money**: all monetary values are in cents (i64)
//! 3. **Explicit Settings**: store settings are a value, never global state
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart::Cart;
//! use storefront_core::{CartItem, Money, Product};
//!
//! let product = Product {
//!     id: "prod-500ml".into(),
//!     name: "Açaí 500ml".into(),
//!     description: None,
//!     price: Money::from_cents(1890),
//!     image: None,
//!     category_id: "cat-acai".into(),
//!     group_ids: vec![],
//!     display_order: None,
//!     active: true,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::plain(product)).unwrap();
//!
//! // R$ 18,90 + R$ 7,00 delivery
//! let totals = cart.totals(Some(Money::from_cents(700)));
//! assert_eq!(totals.total.cents(), 2590);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod configurator;
pub mod coupon;
pub mod error;
pub mod ingest;
pub mod money;
pub mod pricing;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
