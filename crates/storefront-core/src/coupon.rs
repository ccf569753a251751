//! # Coupons
//!
//! Lookup and eligibility of discount codes.
//!
//! ## User Workflow
//! ```text
//! Customer types " sabor10 "
//!      │
//!      ▼
//! normalize_code → "SABOR10"
//!      │
//!      ├── no active coupon with that code ──► InvalidCoupon
//!      │
//!      ├── subtotal < min_order_value ───────► BelowMinimumOrder
//!      │
//!      └── OK → stored as the cart's single applied coupon
//! ```

use crate::error::{CoreError, CoreResult};
use crate::pricing::compute_subtotal;
use crate::types::{CartItem, Coupon};

/// Trims and upper-cases a typed code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// First active coupon whose code matches `code`, case-insensitively.
///
/// Both sides are normalized: the typed code and the stored one. Ingestion
/// already stores codes upper-cased, so this only matters for coupons built
/// by hand.
pub fn find_coupon<'a>(coupons: &'a [Coupon], code: &str) -> Option<&'a Coupon> {
    let wanted = normalize_code(code);
    if wanted.is_empty() {
        return None;
    }
    coupons
        .iter()
        .find(|c| c.active && normalize_code(&c.code) == wanted)
}

/// Checks a code against the coupon list and the current cart.
///
/// Returns the coupon to store as the applied coupon. Nothing is mutated:
/// the caller owns the single applied-coupon slot.
///
/// ## Example
/// ```rust
/// use storefront_core::coupon::apply_coupon;
/// use storefront_core::types::{Coupon, CouponDiscount, DiscountRate};
/// use storefront_core::CoreError;
///
/// let coupons = vec![Coupon {
///     id: "1".into(),
///     code: "SABOR10".into(),
///     discount: CouponDiscount::Percent(DiscountRate::from_bps(1000)),
///     active: true,
///     usage_count: 0,
///     min_order_value: None,
/// }];
///
/// assert!(apply_coupon(&[], &coupons, " sabor10 ").is_ok());
/// assert!(matches!(
///     apply_coupon(&[], &coupons, "SABOR99"),
///     Err(CoreError::InvalidCoupon { .. })
/// ));
/// ```
pub fn apply_coupon(items: &[CartItem], coupons: &[Coupon], code: &str) -> CoreResult<Coupon> {
    let coupon = find_coupon(coupons, code).ok_or_else(|| CoreError::InvalidCoupon {
        code: normalize_code(code),
    })?;

    if let Some(minimum) = coupon.min_order_value {
        let subtotal = compute_subtotal(items);
        if subtotal < minimum {
            return Err(CoreError::BelowMinimumOrder {
                code: coupon.code.clone(),
                minimum,
                subtotal,
            });
        }
    }

    Ok(coupon.clone())
}

// =============================================================================
// Unit Tests
// =============================================================================
