//! # Commands Module
//!
//! Everything the storefront frontend can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── store.rs     ◄─── Open/closed status, menu
//! ├── cart.rs      ◄─── Cart manipulation, option modal
//! ├── coupon.rs    ◄─── Coupon apply/remove
//! └── checkout.rs  ◄─── Order submission, WhatsApp hand-off
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  const res = await invoke('add_to_cart', { productId: 'p1' });          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  fn add_to_cart(                                                        │
//! │      catalog: &CatalogState,   ◄── injected                             │
//! │      cart: &CartState,         ◄── injected                             │
//! │      status: &StatusState,     ◄── injected                             │
//! │      product_id: String,       ◄── from invoke params                   │
//! │  ) -> Result<AddToCartResponse, ApiError>                               │
//! │         │                                                               │
//! │         │ (JSON serialization, camelCase)                               │
//! │         ▼                                                               │
//! │  Frontend receives: { kind: 'added', cart: {...} }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the status
//! fn get_store_status(status: &StatusState)
//!
//! // Only needs the cart
//! fn get_cart(cart: &CartState, ...)
//!
//! // Needs the catalog, the cart and the status gate
//! fn add_to_cart(catalog: &CatalogState, cart: &CartState, status: &StatusState, ...)
//! ```

pub mod cart;
pub mod checkout;
pub mod coupon;
pub mod store;
