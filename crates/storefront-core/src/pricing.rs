//! # Pricing
//!
//! Option selection rules, unit prices, cart totals and discounts.
//!
//! ## Price Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product modal                                                          │
//! │    adjust_option(...)  ──► max enforced on every tap                    │
//! │    validate_selection  ──► min checked only when confirming             │
//! │    compute_unit_price  ──► frozen into CartItem.unit_price              │
//! │                                                                         │
//! │  Cart / checkout                                                        │
//! │    line_total = unit_price × quantity                                   │
//! │    subtotal   = Σ line_total                                            │
//! │    discount   = percent: subtotal × rate │ fixed: value │ none: 0       │
//! │    total      = max(0, subtotal − discount) + delivery fee              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is total: unknown option ids, missing groups and
//! inactive entries contribute nothing instead of failing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartItem, Coupon, CouponDiscount, Product, ProductGroup, SelectedOptions};

// =============================================================================
// Option Selection
// =============================================================================

/// Total selected quantity across the group's active options.
pub fn group_total(group: &ProductGroup, selected: &SelectedOptions) -> u32 {
    group
        .active_options()
        .map(|o| selected.get(&o.id).copied().unwrap_or(0))
        .sum()
}

/// Whether the selection satisfies `min ≤ total ≤ max` for the group.
///
/// ## Example
/// ```rust
/// use storefront_core::pricing::validate_selection;
/// use storefront_core::types::{ProductGroup, ProductOption, SelectedOptions};
/// use storefront_core::Money;
///
/// let size = ProductGroup {
///     id: "size".into(),
///     title: "Size".into(),
///     min: 1,
///     max: 1,
///     options: vec![ProductOption {
///         id: "500ml".into(),
///         name: "500ml".into(),
///         price: Money::zero(),
///         description: None,
///         active: true,
///     }],
///     active: true,
/// };
///
/// let mut selected = SelectedOptions::new();
/// assert!(!validate_selection(&size, &selected));
/// selected.insert("500ml".into(), 1);
/// assert!(validate_selection(&size, &selected));
/// ```
pub fn validate_selection(group: &ProductGroup, selected: &SelectedOptions) -> bool {
    let total = group_total(group, selected);
    group.min <= total && total <= group.max
}

/// Applies `delta` to one option of the group and returns the new selection.
///
/// ## Rules
/// - Unknown or inactive option: unchanged.
/// - Increment: unchanged when the group is already at `max`; otherwise
///   capped to the remaining capacity, so `max` can never be exceeded.
/// - Decrement: saturates at zero (zeroed entries are dropped).
///
/// `min` is not enforced here; an interactive selection passes through
/// invalid states before confirmation.
pub fn adjust_option(
    group: &ProductGroup,
    selected: &SelectedOptions,
    option_id: &str,
    delta: i64,
) -> SelectedOptions {
    let mut next = selected.clone();
    if delta == 0 || group.active_option(option_id).is_none() {
        return next;
    }

    let current = selected.get(option_id).copied().unwrap_or(0);
    let updated = if delta > 0 {
        let total = group_total(group, selected);
        if total >= group.max {
            return next;
        }
        let room = (group.max - total) as i64;
        current + delta.min(room) as u32
    } else {
        let drop = delta.unsigned_abs().min(current as u64) as u32;
        current - drop
    };

    if updated == 0 {
        next.remove(option_id);
    } else {
        next.insert(option_id.to_string(), updated);
    }
    next
}

// =============================================================================
// Prices
// =============================================================================

/// Product price plus `price × qty` for every active option of every active
/// group attached to the product.
///
/// Groups not listed in `product.group_ids`, inactive groups and inactive
/// options contribute zero even when present in `selected`.
pub fn compute_unit_price(
    product: &Product,
    selected: &SelectedOptions,
    groups: &[ProductGroup],
) -> Money {
    let extras: Money = product
        .group_ids
        .iter()
        .filter_map(|gid| groups.iter().find(|g| &g.id == gid))
        .filter(|g| g.active)
        .flat_map(|g| g.active_options())
        .map(|o| o.price * i64::from(selected.get(&o.id).copied().unwrap_or(0)))
        .sum();

    product.price + extras
}

/// `unit_price × quantity` of one cart line.
#[inline]
pub fn compute_line_total(item: &CartItem) -> Money {
    item.line_total()
}

/// Sum of every line total.
pub fn compute_subtotal(items: &[CartItem]) -> Money {
    items.iter().map(compute_line_total).sum()
}

/// Amount the coupon takes off `subtotal`.
///
/// Not capped here; [`compute_final_total`] keeps the result non-negative.
pub fn compute_discount(subtotal: Money, coupon: Option<&Coupon>) -> Money {
    match coupon.map(|c| c.discount) {
        Some(CouponDiscount::Percent(rate)) => subtotal.portion(rate),
        Some(CouponDiscount::Fixed(amount)) => amount,
        None => Money::zero(),
    }
}

/// `max(0, subtotal − discount) + delivery_fee`.
///
/// The delivery fee is never discounted.
///
/// ## Example
/// ```rust
/// use storefront_core::pricing::compute_final_total;
/// use storefront_core::Money;
///
/// let total = compute_final_total(
///     Money::from_cents(1000),
///     Money::from_cents(2000),
///     Some(Money::from_cents(500)),
/// );
/// assert_eq!(total.cents(), 500);
/// ```
pub fn compute_final_total(subtotal: Money, discount: Money, delivery_fee: Option<Money>) -> Money {
    (subtotal - discount).clamp_non_negative() + delivery_fee.unwrap_or_default()
}

/// Cart totals summary for display and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

/// Prices a whole cart in one call.
pub fn price_cart(
    items: &[CartItem],
    coupon: Option<&Coupon>,
    delivery_fee: Option<Money>,
) -> PriceBreakdown {
    let subtotal = compute_subtotal(items);
    let discount = compute_discount(subtotal, coupon);
    PriceBreakdown {
        subtotal,
        discount,
        delivery_fee: delivery_fee.unwrap_or_default(),
        total: compute_final_total(subtotal, discount, delivery_fee),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscountRate, ProductOption};

    fn option(id: &str, cents: i64, active: bool) -> ProductOption {
        ProductOption {
            id: id.to_string(),
            name: id.to_uppercase(),
            price: Money::from_cents(cents),
            description: None,
            active,
        }
    }

    fn toppings() -> ProductGroup {
        ProductGroup {
            id: "toppings".into(),
            title: "Toppings".into(),
            min: 1,
            max: 3,
            options: vec![
                option("granola", 200, true),
                option("banana", 150, true),
                option("nutella", 400, false),
            ],
            active: true,
        }
    }

    fn sauces(active: bool) -> ProductGroup {
        ProductGroup {
            id: "sauces".into(),
            title: "Sauces".into(),
            min: 0,
            max: 2,
            options: vec![option("condensed", 100, true)],
            active,
        }
    }

    fn product(group_ids: &[&str]) -> Product {
        Product {
            id: "acai500".into(),
            name: "Açaí 500ml".into(),
            description: None,
            price: Money::from_cents(1800),
            image: None,
            category_id: "acai".into(),
            group_ids: group_ids.iter().map(|s| s.to_string()).collect(),
            display_order: Some(1),
            active: true,
        }
    }

    fn line(unit_cents: i64, quantity: i64) -> CartItem {
        let mut item = CartItem::plain(product(&[]));
        item.unit_price = Money::from_cents(unit_cents);
        item.quantity = quantity;
        item
    }

    fn coupon(discount: CouponDiscount) -> Coupon {
        Coupon {
            id: "c1".into(),
            code: "SABOR".into(),
            discount,
            active: true,
            usage_count: 0,
            min_order_value: None,
        }
    }

    fn selection(pairs: &[(&str, u32)]) -> SelectedOptions {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_group_total_ignores_inactive_and_foreign_options() {
        let selected = selection(&[("granola", 1), ("nutella", 5), ("other", 9)]);
        assert_eq!(group_total(&toppings(), &selected), 1);
    }

    #[test]
    fn test_validate_selection_min_gate() {
        let group = toppings();
        assert!(!validate_selection(&group, &SelectedOptions::new()));
        assert!(validate_selection(&group, &selection(&[("granola", 1)])));
        assert!(validate_selection(&group, &selection(&[("granola", 2), ("banana", 1)])));
        assert!(!validate_selection(&group, &selection(&[("granola", 4)])));
    }

    #[test]
    fn test_adjust_option_never_exceeds_max() {
        let group = toppings();
        let mut selected = SelectedOptions::new();

        for (i, id) in ["granola", "banana", "granola", "banana", "granola"].iter().enumerate() {
            selected = adjust_option(&group, &selected, id, 1);
            assert!(group_total(&group, &selected) <= group.max, "step {}", i);
        }
        assert_eq!(group_total(&group, &selected), 3);
        assert_eq!(selected.get("granola"), Some(&2));
        assert_eq!(selected.get("banana"), Some(&1));
    }

    #[test]
    fn test_adjust_option_large_delta_is_capped() {
        let group = toppings();
        let selected = adjust_option(&group, &selection(&[("banana", 1)]), "granola", 10);
        assert_eq!(selected.get("granola"), Some(&2));
        assert_eq!(group_total(&group, &selected), group.max);
    }

    #[test]
    fn test_adjust_option_decrement_floors_at_zero() {
        let group = toppings();
        let empty = SelectedOptions::new();

        assert_eq!(adjust_option(&group, &empty, "granola", -1), empty);

        let one = selection(&[("granola", 1)]);
        let cleared = adjust_option(&group, &one, "granola", -5);
        assert!(cleared.get("granola").is_none());

        let two = selection(&[("granola", 2)]);
        assert_eq!(adjust_option(&group, &two, "granola", -1).get("granola"), Some(&1));
    }

    #[test]
    fn test_adjust_option_unknown_or_inactive_is_noop() {
        let group = toppings();
        let selected = selection(&[("granola", 1)]);

        assert_eq!(adjust_option(&group, &selected, "nutella", 1), selected);
        assert_eq!(adjust_option(&group, &selected, "missing", 1), selected);
        assert_eq!(adjust_option(&group, &selected, "granola", 0), selected);
    }

    #[test]
    fn test_decrement_allowed_at_max() {
        let group = toppings();
        let full = selection(&[("granola", 3)]);
        assert_eq!(adjust_option(&group, &full, "granola", -1).get("granola"), Some(&2));
    }

    #[test]
    fn test_unit_price_is_additive() {
        let groups = vec![toppings(), sauces(true)];
        let p = product(&["toppings", "sauces"]);
        let selected = selection(&[("granola", 2), ("banana", 1), ("condensed", 1)]);

        // 18,00 + 2×2,00 + 1,50 + 1,00
        assert_eq!(compute_unit_price(&p, &selected, &groups).cents(), 2450);
    }

    #[test]
    fn test_unit_price_ignores_inactive_and_unattached() {
        let groups = vec![toppings(), sauces(false)];
        let selected = selection(&[("nutella", 3), ("condensed", 2)]);

        // inactive option, inactive group
        let attached = product(&["toppings", "sauces"]);
        assert_eq!(compute_unit_price(&attached, &selected, &groups).cents(), 1800);

        // active group that is not attached to the product
        let groups = vec![sauces(true)];
        let unattached = product(&["toppings"]);
        assert_eq!(compute_unit_price(&unattached, &selected, &groups).cents(), 1800);

        // missing group id
        let dangling = product(&["ghost"]);
        assert_eq!(compute_unit_price(&dangling, &selected, &groups).cents(), 1800);
    }

    #[test]
    fn test_line_total_and_subtotal() {
        let items = vec![line(1800, 2), line(2450, 1)];
        assert_eq!(compute_line_total(&items[0]).cents(), 3600);
        assert_eq!(compute_subtotal(&items).cents(), 6050);
        assert_eq!(compute_subtotal(&[]).cents(), 0);
    }

    #[test]
    fn test_discount_kinds() {
        let subtotal = Money::from_cents(10000);
        let percent = coupon(CouponDiscount::Percent(DiscountRate::from_bps(1000)));
        let fixed = coupon(CouponDiscount::Fixed(Money::from_cents(700)));

        assert_eq!(compute_discount(subtotal, Some(&percent)).cents(), 1000);
        assert_eq!(compute_discount(subtotal, Some(&fixed)).cents(), 700);
        assert_eq!(compute_discount(subtotal, None).cents(), 0);
    }

    #[test]
    fn test_discount_clamp_keeps_fee() {
        let total = compute_final_total(Money::from_cents(1000), Money::from_cents(2000), None);
        assert!(total.is_zero());

        let total = compute_final_total(
            Money::from_cents(1000),
            Money::from_cents(2000),
            Some(Money::from_cents(700)),
        );
        assert_eq!(total.cents(), 700);
    }

    #[test]
    fn test_scenario_percent_coupon_with_delivery() {
        let items = vec![line(10000, 1)];
        let percent = coupon(CouponDiscount::Percent(DiscountRate::from_bps(1000)));

        let breakdown = price_cart(&items, Some(&percent), Some(Money::from_cents(500)));
        assert_eq!(breakdown.subtotal.cents(), 10000);
        assert_eq!(breakdown.discount.cents(), 1000);
        assert_eq!(breakdown.delivery_fee.cents(), 500);
        assert_eq!(breakdown.total.cents(), 9500);
    }

    #[test]
    fn test_scenario_fixed_coupon_pickup() {
        let items = vec![line(1000, 3)];
        let fixed = coupon(CouponDiscount::Fixed(Money::from_cents(700)));

        let breakdown = price_cart(&items, Some(&fixed), None);
        assert_eq!(breakdown.discount.cents(), 700);
        assert!(breakdown.delivery_fee.is_zero());
        assert_eq!(breakdown.total.cents(), 2300);
    }
}
