//! # Cart Commands
//!
//! Commands for cart manipulation and the product option modal.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ WhatsApp │       │
//! │  │  Cart    │     │          │     │  Form    │     │ hand-off │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       │                │                                  │             │
//! │  add_to_cart      update_cart_item                   checkout          │
//! │       │           update_cart_note                  (checkout.rs)      │
//! │       ▼           remove_from_cart                        │             │
//! │  ┌──────────┐          │                                  ▼             │
//! │  │  Option  │     clear_cart ─────────────────────► (back to empty)    │
//! │  │  Modal   │                                                           │
//! │  └──────────┘                                                           │
//! │       │                                                                 │
//! │  add_configured_item                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use storefront_core::cart::Cart;
use storefront_core::configurator::{ConfigStart, ItemConfigurator};
use storefront_core::pricing::PriceBreakdown;
use storefront_core::validation::validate_quantity;
use storefront_core::{
    CartItem, CoreError, Coupon, DeliveryMethod, Money, Product, ProductGroup, SelectedOptions,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, CatalogState, StatusState};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub applied_coupon: Option<Coupon>,
    pub totals: PriceBreakdown,
    pub item_count: usize,
    pub total_quantity: i64,
}

impl CartResponse {
    /// Builds the response, pricing in `delivery_fee` when given.
    pub fn build(cart: &Cart, delivery_fee: Option<Money>) -> Self {
        CartResponse {
            items: cart.items.clone(),
            applied_coupon: cart.applied_coupon.clone(),
            totals: cart.totals(delivery_fee),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
        }
    }
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse::build(cart, None)
    }
}

/// Gets the current cart contents.
///
/// With `method` = `DELIVERY` the store's delivery fee is included in the
/// totals; pickup and no method leave it out.
pub fn get_cart(
    catalog: &CatalogState,
    cart: &CartState,
    method: Option<DeliveryMethod>,
) -> CartResponse {
    debug!(?method, "get_cart command");
    let fee = match method {
        Some(DeliveryMethod::Delivery) => Some(catalog.settings().delivery_fee),
        _ => None,
    };
    cart.with_cart(|c| CartResponse::build(c, fee))
}

/// Outcome of tapping a product.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AddToCartResponse {
    /// No options to pick: one unit was added.
    Added { cart: CartResponse },
    /// The option modal has to be shown first.
    #[serde(rename_all = "camelCase")]
    NeedsConfiguration {
        product: Product,
        groups: Vec<ProductGroup>,
    },
}

/// Looks an orderable product up and opens it for configuration.
fn open_product(catalog: &CatalogState, product_id: &str) -> Result<ConfigStart, CoreError> {
    catalog.with_snapshot(|s| {
        let product = s
            .catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        if !product.active {
            return Err(CoreError::ProductUnavailable(product.name.clone()));
        }
        Ok(ItemConfigurator::start(product, &s.catalog))
    })
}

fn ensure_open(status: &StatusState) -> Result<(), ApiError> {
    if status.is_open() {
        Ok(())
    } else {
        Err(CoreError::StoreClosed.into())
    }
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Store closed: refused with `STORE_CLOSED`
/// - Product with active option groups: nothing is added, the groups to
///   show in the modal are returned
/// - Otherwise: one unit is added as a new line at the product price
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Customer taps a product on the menu                                   │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  invoke('add_to_cart', { productId: 'p2' })                             │
/// │                    │                                                    │
/// │          ┌─────────┴──────────┐                                         │
/// │          ▼                    ▼                                         │
/// │   { kind: 'added' }   { kind: 'needsConfiguration', groups: [...] }    │
/// │   cart badge updates   modal opens ──► add_configured_item             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    status: &StatusState,
    product_id: String,
) -> Result<AddToCartResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");
    ensure_open(status)?;

    match open_product(catalog, &product_id)? {
        ConfigStart::Direct(item) => {
            let response = cart.with_cart_mut(|c| {
                c.add_item(item)?;
                Ok::<_, CoreError>(CartResponse::from(&*c))
            })?;
            Ok(AddToCartResponse::Added { cart: response })
        }
        ConfigStart::Configuring(configurator) => Ok(AddToCartResponse::NeedsConfiguration {
            product: configurator.product().clone(),
            groups: configurator.groups().to_vec(),
        }),
    }
}

/// What the option modal submits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub selected_options: SelectedOptions,
    pub quantity: Option<i64>,
    pub note: Option<String>,
}

/// Adds a product with the options picked in the modal.
///
/// The selection is replayed through the configurator against the current
/// catalog, so prices and group bounds come from the store data, never from
/// the request.
///
/// ## Errors
/// - `STORE_CLOSED` while the store is closed
/// - `VALIDATION_ERROR` for an unknown option, a quantity above a group's
///   maximum, or a group below its minimum
pub fn add_configured_item(
    catalog: &CatalogState,
    cart: &CartState,
    status: &StatusState,
    request: ConfiguredItemRequest,
) -> Result<CartResponse, ApiError> {
    debug!(
        product_id = %request.product_id,
        options = request.selected_options.len(),
        quantity = ?request.quantity,
        "add_configured_item command"
    );
    ensure_open(status)?;

    let quantity = request.quantity.unwrap_or(1);
    validate_quantity(quantity)?;
    let note = request.note.unwrap_or_default();

    let item = match open_product(catalog, &request.product_id)? {
        ConfigStart::Direct(mut item) => {
            item.quantity = quantity;
            let note = note.trim();
            item.note = (!note.is_empty()).then(|| note.to_string());
            item
        }
        ConfigStart::Configuring(mut configurator) => {
            for (option_id, &wanted) in &request.selected_options {
                if wanted == 0 {
                    continue;
                }
                let group = configurator
                    .groups()
                    .iter()
                    .find(|g| g.active_option(option_id).is_some())
                    .map(|g| (g.id.clone(), g.title.clone()))
                    .ok_or_else(|| ApiError::validation(format!("Option not available: {}", option_id)))?;

                configurator.adjust(&group.0, option_id, i64::from(wanted));
                if configurator.selected().get(option_id) != Some(&wanted) {
                    return Err(ApiError::validation(format!(
                        "Too many options selected in {}",
                        group.1
                    )));
                }
            }

            configurator.set_quantity(quantity);
            configurator.set_note(note);
            configurator.confirm().map_err(|configurator| {
                let titles: Vec<&str> = configurator
                    .unsatisfied_groups()
                    .into_iter()
                    .map(|g| g.title.as_str())
                    .collect();
                ApiError::validation(format!("Selection incomplete: {}", titles.join(", ")))
            })?
        }
    };

    let response = cart.with_cart_mut(|c| {
        c.add_item(item)?;
        Ok::<_, CoreError>(CartResponse::from(&*c))
    })?;
    Ok(response)
}

/// Sets a line's quantity. Zero removes the line.
pub fn update_cart_item(
    cart: &CartState,
    cart_id: String,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(cart_id = %cart_id, quantity = %quantity, "update_cart_item command");

    let response = cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        if c.item(&cart_id).is_none() {
            return Err(ApiError::not_found("Cart item", &cart_id));
        }
        c.update_quantity(&cart_id, quantity)?;
        Ok(CartResponse::from(&*c))
    })?;
    Ok(response)
}

/// Sets a line's observation. Blank text clears it.
pub fn update_cart_note(
    cart: &CartState,
    cart_id: String,
    note: String,
) -> Result<CartResponse, ApiError> {
    debug!(cart_id = %cart_id, "update_cart_note command");

    cart.with_cart_mut(|c| {
        if c.item(&cart_id).is_none() {
            return Err(ApiError::not_found("Cart item", &cart_id));
        }
        c.update_note(&cart_id, &note);
        Ok(CartResponse::from(&*c))
    })
}

/// Removes a line from the cart.
pub fn remove_from_cart(cart: &CartState, cart_id: String) -> Result<CartResponse, ApiError> {
    debug!(cart_id = %cart_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        if !c.remove_item(&cart_id) {
            return Err(ApiError::not_found("Cart item", &cart_id));
        }
        Ok(CartResponse::from(&*c))
    })
}

/// Clears all lines and the applied coupon.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::fixture;
    use crate::error::ErrorCode;
    use std::collections::BTreeMap;
    use storefront_core::StoreStatusMode;

    fn options(pairs: &[(&str, u32)]) -> SelectedOptions {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>()
    }

    fn added(response: AddToCartResponse) -> CartResponse {
        match response {
            AddToCartResponse::Added { cart } => cart,
            other => panic!("expected Added, got {:?}", other),
        }
    }

    #[test]
    fn test_add_plain_product() {
        let f = fixture(StoreStatusMode::Open);
        let cart = added(add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap());

        assert_eq!(cart.item_count, 1);
        assert_eq!(cart.items[0].unit_price.cents(), 1290);
        assert_eq!(cart.totals.total.cents(), 1290);
    }

    #[test]
    fn test_same_product_twice_is_two_lines() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();
        let cart = added(add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap());

        assert_eq!(cart.item_count, 2);
        assert_ne!(cart.items[0].cart_id, cart.items[1].cart_id);
    }

    #[test]
    fn test_add_product_with_groups_needs_configuration() {
        let f = fixture(StoreStatusMode::Open);
        let response = add_to_cart(&f.catalog, &f.cart, &f.status, "p2".into()).unwrap();

        match response {
            AddToCartResponse::NeedsConfiguration { product, groups } => {
                assert_eq!(product.id, "p2");
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].title, "Adicionais");
            }
            other => panic!("expected NeedsConfiguration, got {:?}", other),
        }
        assert_eq!(f.cart.with_cart(|c| c.item_count()), 0);
    }

    #[test]
    fn test_add_refused_when_closed() {
        let f = fixture(StoreStatusMode::Closed);
        let err = add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreClosed);
        assert!(f.cart.with_cart(|c| c.is_empty()));
    }

    #[test]
    fn test_add_unknown_and_inactive_products() {
        let f = fixture(StoreStatusMode::Open);

        let err = add_to_cart(&f.catalog, &f.cart, &f.status, "nope".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = add_to_cart(&f.catalog, &f.cart, &f.status, "p3".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_add_configured_item() {
        let f = fixture(StoreStatusMode::Open);
        let request = ConfiguredItemRequest {
            product_id: "p2".into(),
            selected_options: options(&[("o1", 2), ("o2", 1)]),
            quantity: Some(2),
            note: Some("  sem açúcar ".into()),
        };

        let cart = add_configured_item(&f.catalog, &f.cart, &f.status, request).unwrap();

        let line = &cart.items[0];
        // 18.00 + 2 × 2.00 + 3.00
        assert_eq!(line.unit_price.cents(), 2500);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.note.as_deref(), Some("sem açúcar"));
        assert_eq!(cart.totals.subtotal.cents(), 5000);
    }

    #[test]
    fn test_add_configured_item_below_minimum() {
        let f = fixture(StoreStatusMode::Open);
        let request = ConfiguredItemRequest {
            product_id: "p2".into(),
            ..Default::default()
        };

        let err = add_configured_item(&f.catalog, &f.cart, &f.status, request).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Adicionais"));
        assert!(f.cart.with_cart(|c| c.is_empty()));
    }

    #[test]
    fn test_add_configured_item_above_maximum() {
        let f = fixture(StoreStatusMode::Open);
        let request = ConfiguredItemRequest {
            product_id: "p2".into(),
            selected_options: options(&[("o1", 4)]),
            ..Default::default()
        };

        let err = add_configured_item(&f.catalog, &f.cart, &f.status, request).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_add_configured_item_unknown_option() {
        let f = fixture(StoreStatusMode::Open);
        let request = ConfiguredItemRequest {
            product_id: "p2".into(),
            selected_options: options(&[("o1", 1), ("ghost", 1)]),
            ..Default::default()
        };

        let err = add_configured_item(&f.catalog, &f.cart, &f.status, request).unwrap_err();
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn test_update_quantity_and_remove_by_zero() {
        let f = fixture(StoreStatusMode::Open);
        let cart = added(add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap());
        let id = cart.items[0].cart_id.clone();

        let cart = update_cart_item(&f.cart, id.clone(), 3).unwrap();
        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.totals.subtotal.cents(), 3870);

        let cart = update_cart_item(&f.cart, id, 0).unwrap();
        assert_eq!(cart.item_count, 0);
    }

    #[test]
    fn test_update_unknown_line() {
        let f = fixture(StoreStatusMode::Open);
        let err = update_cart_item(&f.cart, "missing".into(), 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_update_note_and_remove() {
        let f = fixture(StoreStatusMode::Open);
        let cart = added(add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap());
        let id = cart.items[0].cart_id.clone();

        let cart = update_cart_note(&f.cart, id.clone(), "bem gelado".into()).unwrap();
        assert_eq!(cart.items[0].note.as_deref(), Some("bem gelado"));

        let cart = update_cart_note(&f.cart, id.clone(), "   ".into()).unwrap();
        assert_eq!(cart.items[0].note, None);

        let cart = remove_from_cart(&f.cart, id.clone()).unwrap();
        assert!(cart.items.is_empty());
        assert!(remove_from_cart(&f.cart, id).is_err());
    }

    #[test]
    fn test_get_cart_includes_fee_for_delivery_only() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();

        let delivery = get_cart(&f.catalog, &f.cart, Some(DeliveryMethod::Delivery));
        assert_eq!(delivery.totals.delivery_fee.cents(), 700);
        assert_eq!(delivery.totals.total.cents(), 1990);

        let pickup = get_cart(&f.catalog, &f.cart, Some(DeliveryMethod::Pickup));
        assert_eq!(pickup.totals.total.cents(), 1290);
        assert_eq!(get_cart(&f.catalog, &f.cart, None).totals.delivery_fee.cents(), 0);
    }

    #[test]
    fn test_clear_cart_drops_coupon() {
        let f = fixture(StoreStatusMode::Open);
        add_to_cart(&f.catalog, &f.cart, &f.status, "p1".into()).unwrap();
        f.catalog.with_snapshot(|s| {
            f.cart
                .with_cart_mut(|c| c.apply_coupon(&s.coupons, "sabor10").map(|_| ()))
                .unwrap()
        });

        let cart = clear_cart(&f.cart);
        assert!(cart.items.is_empty());
        assert!(cart.applied_coupon.is_none());
    }

    #[test]
    fn test_response_wire_shape() {
        let f = fixture(StoreStatusMode::Open);
        let response = add_to_cart(&f.catalog, &f.cart, &f.status, "p2".into()).unwrap();
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["kind"], "needsConfiguration");
        assert_eq!(json["groups"][0]["max"], 3);
    }
}
