//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule failures (coupon, cart, store)    │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  storefront app errors                                                  │
//! │  └── ApiError         - What the frontend sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Option/group selection is NOT an error: an incomplete selection is a
//! boolean gate (`pricing::validate_selection`) that keeps the "confirm"
//! action disabled.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Failures of a cart, coupon or catalog operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No active coupon matches the typed code.
    ///
    /// ## When This Occurs
    /// - Code was never created
    /// - Coupon exists but an admin deactivated it
    #[error("Invalid coupon: {code}")]
    InvalidCoupon { code: String },

    /// The cart subtotal is below the coupon's configured floor.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart subtotal: 49,99
    ///      │
    ///      ▼
    /// apply_coupon("SABOR10")  (minimum 50,00)
    ///      │
    ///      ▼
    /// BelowMinimumOrder { minimum: 50,00, subtotal: 49,99 }
    ///      │
    ///      ▼
    /// UI shows: "Minimum order for this coupon: R$ 50,00"
    /// ```
    #[error("Coupon {code} requires a minimum order of {minimum} (subtotal {subtotal})")]
    BelowMinimumOrder {
        code: String,
        minimum: Money,
        subtotal: Money,
    },

    /// Product is not in the current catalog snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but is deactivated.
    #[error("Product is not available: {0}")]
    ProductUnavailable(String),

    /// The store is closed; adding to cart and checkout are blocked.
    #[error("Store is closed")]
    StoreClosed,

    /// The cart already holds `MAX_CART_ITEMS` lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A line quantity above `MAX_ITEM_QUANTITY`.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A field-level problem in caller input or a backend row.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field that failed a check.
///
/// `field` uses the name the frontend or backend row knows it by
/// (`dayOfWeek`, `name`, `address`...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Missing, or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Longer than `max` characters (not bytes).
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative where only positive makes sense (quantities).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. "25:00" for a time of day).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Not one of a fixed set of spellings (store status, coupon type).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. two opening-hour entries for the same day).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
