//! # Coupon Commands
//!
//! Apply and remove the cart's discount code.
//!
//! Failures are not errors here: the coupon field shows the message inline,
//! so both outcomes come back as [`CouponFeedback`].

use serde::Serialize;
use storefront_core::CoreError;
use tracing::debug;

use super::cart::CartResponse;
use crate::state::{AppConfig, CartState, CatalogState};

pub const MSG_COUPON_APPLIED: &str = "Cupom aplicado com sucesso!";
pub const MSG_COUPON_INVALID: &str = "Cupom inválido ou expirado";

/// Result of a coupon attempt, plus the cart as it stands afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFeedback {
    pub success: bool,
    pub message: String,
    pub cart: CartResponse,
}

/// Applies a discount code to the cart.
///
/// ## Behavior
/// - Codes match case-insensitively against active coupons
/// - A coupon with a minimum order is refused while the subtotal is below it
/// - A successful code replaces any previously applied one
/// - A failed attempt leaves the applied coupon untouched
pub fn apply_coupon(
    catalog: &CatalogState,
    cart: &CartState,
    config: &AppConfig,
    code: String,
) -> CouponFeedback {
    debug!(code = %code, "apply_coupon command");

    let coupons = catalog.with_snapshot(|s| s.coupons.clone());
    let (outcome, response) = cart.with_cart_mut(|c| {
        let outcome = c.apply_coupon(&coupons, &code).map(|coupon| coupon.code.clone());
        (outcome, CartResponse::from(&*c))
    });

    let (success, message) = match outcome {
        Ok(applied) => {
            debug!(code = %applied, "Coupon applied");
            (true, MSG_COUPON_APPLIED.to_string())
        }
        Err(CoreError::BelowMinimumOrder { minimum, .. }) => (
            false,
            format!("Valor mínimo para este cupom: {}", config.format_currency(minimum)),
        ),
        Err(err) => {
            debug!(error = %err, "Coupon rejected");
            (false, MSG_COUPON_INVALID.to_string())
        }
    };

    CouponFeedback {
        success,
        message,
        cart: response,
    }
}

/// Drops the applied coupon, if any.
pub fn remove_coupon(cart: &CartState) -> CartResponse {
    debug!("remove_coupon command");
    cart.with_cart_mut(|c| {
        c.remove_coupon();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::add_to_cart;
    use crate::commands::fixtures::fixture;
    use storefront_core::StoreStatusMode;

    #[test]
    fn test_apply_percent_coupon_case_insensitive() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();

        let feedback = apply_coupon(&f.catalog, &f.cart, &f.config, " sabor10 ".into());

        assert!(feedback.success);
        assert_eq!(feedback.message, "Cupom aplicado com sucesso!");
        assert_eq!(feedback.cart.totals.discount.cents(), 129);
        assert_eq!(feedback.cart.totals.total.cents(), 1161);
    }

    #[test]
    fn test_unknown_coupon() {
        let f = fixture(StoreStatusMode::Open);
        let feedback = apply_coupon(&f.catalog, &f.cart, &f.config, "NADA".into());

        assert!(!feedback.success);
        assert_eq!(feedback.message, "Cupom inválido ou expirado");
        assert!(feedback.cart.applied_coupon.is_none());
    }

    #[test]
    fn test_minimum_order_message() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();

        let feedback = apply_coupon(&f.catalog, &f.cart, &f.config, "FRETE".into());

        assert!(!feedback.success);
        assert_eq!(feedback.message, "Valor mínimo para este cupom: R$ 30,00");
    }

    #[test]
    fn test_failed_attempt_keeps_previous_coupon() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();
        apply_coupon(&f.catalog, &f.cart, &f.config, "SABOR10".into());

        let feedback = apply_coupon(&f.catalog, &f.cart, &f.config, "FRETE".into());

        assert!(!feedback.success);
        let kept = feedback.cart.applied_coupon.unwrap();
        assert_eq!(kept.code, "SABOR10");
    }

    #[test]
    fn test_remove_coupon() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();
        apply_coupon(&f.catalog, &f.cart, &f.config, "SABOR10".into());

        let cart = remove_coupon(&f.cart);
        assert!(cart.applied_coupon.is_none());
        assert_eq!(cart.totals.discount.cents(), 0);
    }
}
