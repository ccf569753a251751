//! # Order Messages
//!
//! Customer-facing text for a submitted order.
//!
//! ## WhatsApp Message Layout
//! ```text
//! *Novo Pedido*
//! Cliente: Ana
//! Tel: 94991623576
//! Tipo: DELIVERY
//! Endereço: Rua A, 10
//! Pagamento: Pix
//!
//! Itens:
//! 2x Açaí 500ml
//!    (Granola 2x, Leite Ninho 1x)
//!    Obs: sem açúcar
//! 1x Açaí 300ml
//!
//! Cupom: SABOR10 (-R$ 6,29)        ◄── only with an applied coupon
//!
//! *Total: R$ 63,61*
//! ```
//!
//! The back-office clipboard copy uses the same item block under a
//! `*Pedido #<id>*` header and never shows the coupon line.

use storefront_core::catalog::Catalog;
use storefront_core::{CartItem, Money, OrderRecord};
use url::Url;

use crate::state::AppConfig;

/// Applied coupon as shown in the message.
#[derive(Debug, Clone, Copy)]
pub struct CouponLine<'a> {
    pub code: &'a str,
    pub discount: Money,
}

/// `(Granola 2x, Leite Ninho 1x)` for one line, or `None` without options.
///
/// Options no longer in the catalog are left out.
fn options_text(catalog: &Catalog, item: &CartItem) -> Option<String> {
    let parts: Vec<String> = item
        .selected_options
        .iter()
        .filter(|(_, qty)| **qty > 0)
        .filter_map(|(id, qty)| catalog.option_name(id).map(|name| format!("{} {}x", name, qty)))
        .collect();

    (!parts.is_empty()).then(|| format!("({})", parts.join(", ")))
}

/// One block per cart line, joined by newlines.
pub fn items_text(catalog: &Catalog, items: &[CartItem]) -> String {
    items
        .iter()
        .map(|item| {
            let mut text = format!("{}x {}", item.quantity, item.product.name);
            if let Some(options) = options_text(catalog, item) {
                text.push_str("\n   ");
                text.push_str(&options);
            }
            if let Some(note) = &item.note {
                text.push_str("\n   Obs: ");
                text.push_str(note);
            }
            text
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Customer and delivery block shared by both layouts.
fn order_header(order: &OrderRecord) -> String {
    format!(
        "Cliente: {}\nTel: {}\nTipo: {}\nEndereço: {}\nPagamento: {}",
        order.customer_name,
        order.whatsapp,
        order.method,
        order.address.as_deref().unwrap_or_default(),
        order.payment_method
    )
}

/// Message sent to the store's WhatsApp.
pub fn order_message(
    catalog: &Catalog,
    config: &AppConfig,
    order: &OrderRecord,
    coupon: Option<CouponLine<'_>>,
) -> String {
    let mut text = format!(
        "*Novo Pedido*\n{}\n\nItens:\n{}",
        order_header(order),
        items_text(catalog, &order.full_details)
    );

    if let Some(coupon) = coupon {
        text.push_str(&format!(
            "\n\nCupom: {} (-{})",
            coupon.code,
            config.format_currency(coupon.discount)
        ));
    }

    text.push_str(&format!("\n\n*Total: {}*", config.format_currency(order.total)));
    text
}

/// Back-office copy of a stored order.
pub fn clipboard_text(catalog: &Catalog, config: &AppConfig, order: &OrderRecord) -> String {
    format!(
        "*Pedido #{}*\n{}\n\nItens:\n{}\n\n*Total: {}*",
        order.id,
        order_header(order),
        items_text(catalog, &order.full_details),
        config.format_currency(order.total)
    )
}

/// `https://wa.me/<number>?text=<message>` with the message form-encoded.
pub fn whatsapp_url(number: &str, message: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(&format!("https://wa.me/{}", number), &[("text", message)])
}
