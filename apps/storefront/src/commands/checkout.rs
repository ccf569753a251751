//! # Checkout Commands
//!
//! Turns the cart into an order and hands it to WhatsApp.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  invoke('checkout', { customerName, phone, method, address, payment })  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │ 1. Store open?                    no ──► STORE_CLOSED          │     │
//! │  │ 2. Name given?                    no ──► VALIDATION_ERROR      │     │
//! │  │ 3. DELIVERY without address?     yes ──► VALIDATION_ERROR      │     │
//! │  │ 4. Payment method chosen?         no ──► VALIDATION_ERROR      │     │
//! │  │ 5. Cart has lines?                no ──► CART_ERROR            │     │
//! │  │ 6. Totals (fee only for DELIVERY)                              │     │
//! │  │ 7. OrderRecord (status pending)                                │     │
//! │  │ 8. WhatsApp message + wa.me URL                                │     │
//! │  │ 9. Cart and coupon cleared                                     │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Frontend stores `order`, opens `whatsappUrl`, navigates home           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 5 to 9 run under a single cart lock.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_customer_name;
use storefront_core::{DeliveryMethod, OrderRecord, OrderStatus, ValidationError};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::message::{self, CouponLine};
use crate::state::{AppConfig, CartState, CatalogState, StatusState};

/// Checkout form contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub phone: String,
    pub method: DeliveryMethod,
    pub address: Option<String>,
    pub payment_method: String,
}

/// The placed order and where to send it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: OrderRecord,
    pub message: String,
    pub whatsapp_url: String,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Places the order.
///
/// ## Returns
/// The order record for the external order store, the WhatsApp text and
/// the `https://wa.me/...` link. The cart is empty afterwards.
pub fn checkout(
    catalog: &CatalogState,
    cart: &CartState,
    status: &StatusState,
    config: &AppConfig,
    request: CheckoutRequest,
) -> Result<CheckoutResponse, ApiError> {
    debug!(method = %request.method, "checkout command");

    if !status.is_open() {
        return Err(storefront_core::CoreError::StoreClosed.into());
    }

    let customer_name = validate_customer_name(&request.customer_name)?;
    let address = non_blank(request.address.as_deref());
    if request.method == DeliveryMethod::Delivery && address.is_none() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        }
        .into());
    }
    let payment_method = non_blank(Some(request.payment_method.as_str())).ok_or_else(|| {
        ApiError::from(ValidationError::Required {
            field: "paymentMethod".to_string(),
        })
    })?;

    catalog.with_snapshot(|snapshot| {
        let settings = &snapshot.settings;

        cart.with_cart_mut(|c| -> Result<CheckoutResponse, ApiError> {
            if c.is_empty() {
                return Err(ApiError::cart("Cart is empty"));
            }

            let fee = (request.method == DeliveryMethod::Delivery).then_some(settings.delivery_fee);
            let totals = c.totals(fee);

            let order = OrderRecord {
                id: Uuid::new_v4().to_string(),
                date: Utc::now(),
                customer_name: customer_name.clone(),
                whatsapp: request.phone.trim().to_string(),
                method: request.method,
                address: address.clone(),
                payment_method: payment_method.clone(),
                total: totals.total,
                items_summary: format!("{} itens", c.item_count()),
                full_details: c.items.clone(),
                status: OrderStatus::Pending,
            };

            let coupon = c.applied_coupon.as_ref().map(|coupon| CouponLine {
                code: &coupon.code,
                discount: totals.discount,
            });
            let text = message::order_message(&snapshot.catalog, config, &order, coupon);
            let url = message::whatsapp_url(&settings.whatsapp_number, &text)
                .map_err(|e| ApiError::internal(format!("Invalid WhatsApp link: {}", e)))?;

            c.clear();

            info!(
                order_id = %order.id,
                items = order.full_details.len(),
                total = %order.total,
                method = %order.method,
                "Order placed"
            );

            Ok(CheckoutResponse {
                order,
                message: text,
                whatsapp_url: url.to_string(),
            })
        })
    })
}

/// Back-office copy of a stored order, ready for the clipboard.
pub fn order_clipboard_text(
    catalog: &CatalogState,
    config: &AppConfig,
    order: &OrderRecord,
) -> String {
    debug!(order_id = %order.id, "order_clipboard_text command");
    catalog.with_snapshot(|s| message::clipboard_text(&s.catalog, config, order))
}
