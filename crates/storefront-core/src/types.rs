//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductGroup   │   │  ProductOption  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price          │──►│  min / max      │──►│  price          │       │
//! │  │  group_ids      │   │  options        │   │  active         │       │
//! │  │  active         │   │  active         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │     Coupon      │   │  StoreSettings  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product (snap) │   │  code           │   │  store_status   │       │
//! │  │  unit_price     │   │  discount       │   │  opening_hours  │       │
//! │  │  (frozen)       │   │  min_order      │   │  delivery_fee   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every flag here is required. Backend rows with missing fields are
//! defaulted exactly once in [`crate::ingest`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a percentage (10.0 = 10%). Negative or
    /// non-finite input yields zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return DiscountRate(0);
        }
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Store Status
// =============================================================================

/// How the open/closed state of the store is decided.
///
/// ```text
///  OPEN    ── manual override, always open
///  CLOSED  ── manual override, always closed
///  AUTO    ── follow the weekly opening hours
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatusMode {
    Open,
    Closed,
    #[default]
    Auto,
}

impl fmt::Display for StoreStatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatusMode::Open => write!(f, "open"),
            StoreStatusMode::Closed => write!(f, "closed"),
            StoreStatusMode::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for StoreStatusMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(StoreStatusMode::Open),
            "closed" => Ok(StoreStatusMode::Closed),
            "auto" => Ok(StoreStatusMode::Auto),
            _ => Err(ValidationError::NotAllowed {
                field: "storeStatus".to_string(),
                allowed: vec!["open".into(), "closed".into(), "auto".into()],
            }),
        }
    }
}

/// One day of the weekly schedule.
///
/// `close < open` means the window crosses midnight (e.g. 18:00 → 02:00):
/// the part after midnight is evaluated on the following day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHour {
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: u8,
    /// Wall-clock opening time, "HH:MM".
    pub open: String,
    /// Wall-clock closing time, "HH:MM".
    pub close: String,
    pub enabled: bool,
}

impl OpeningHour {
    /// Creates an enabled entry.
    pub fn new(day_of_week: u8, open: impl Into<String>, close: impl Into<String>) -> Self {
        OpeningHour {
            day_of_week,
            open: open.into(),
            close: close.into(),
            enabled: true,
        }
    }

    /// Same entry, disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Store-wide settings, passed explicitly into every evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub store_name: String,
    /// Digits only, international format (e.g. "5594991623576").
    pub whatsapp_number: String,
    pub store_status: StoreStatusMode,
    pub delivery_fee: Money,
    pub opening_hours: Vec<OpeningHour>,
    pub closed_message: String,
    pub open_message: String,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub active: bool,
}

/// An addable extra within a group (a topping, a sauce, a size...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub description: Option<String>,
    /// Inactive options are removed from the selectable set entirely.
    pub active: bool,
}

/// A named set of options with selection bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    pub id: String,
    pub title: String,
    /// Minimum total quantity across the group's options.
    pub min: u32,
    /// Maximum total quantity across the group's options.
    pub max: u32,
    pub options: Vec<ProductOption>,
    pub active: bool,
}

impl ProductGroup {
    /// Options that can accrue quantity.
    pub fn active_options(&self) -> impl Iterator<Item = &ProductOption> {
        self.options.iter().filter(|o| o.active)
    }

    /// Finds an active option of this group.
    pub fn active_option(&self, option_id: &str) -> Option<&ProductOption> {
        self.active_options().find(|o| o.id == option_id)
    }

    /// Copy of the group restricted to its active options.
    pub fn selectable(&self) -> ProductGroup {
        ProductGroup {
            options: self.active_options().cloned().collect(),
            ..self.clone()
        }
    }
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image: Option<String>,
    pub category_id: String,
    /// Attached groups, in display order.
    pub group_ids: Vec<String>,
    pub display_order: Option<i32>,
    pub active: bool,
}

/// Selected quantity per option id.
pub type SelectedOptions = BTreeMap<String, u32>;

// =============================================================================
// Cart Item
// =============================================================================

/// One cart line.
///
/// Uses the snapshot pattern: the product and the unit price (options
/// included) are frozen when the line is created, so later catalog edits
/// never change what the customer already has in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique per line, not per product.
    pub cart_id: String,
    pub product: Product,
    pub quantity: i64,
    pub selected_options: SelectedOptions,
    pub note: Option<String>,
    /// Unit price including selected options. Stored orders call it
    /// `totalPrice`.
    #[serde(rename = "totalPrice")]
    pub unit_price: Money,
}

impl CartItem {
    /// Creates a new line with a fresh `cart_id`.
    pub fn new(
        product: Product,
        quantity: i64,
        selected_options: SelectedOptions,
        note: Option<String>,
        unit_price: Money,
    ) -> Self {
        CartItem {
            cart_id: Uuid::new_v4().to_string(),
            product,
            quantity,
            selected_options,
            note,
            unit_price,
        }
    }

    /// Line without options: unit price is the product price.
    pub fn plain(product: Product) -> Self {
        let price = product.price;
        CartItem::new(product, 1, SelectedOptions::new(), None, price)
    }

    /// `unit_price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// What a coupon takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CouponDiscount {
    /// Fraction of the subtotal.
    Percent(DiscountRate),
    /// Flat amount.
    Fixed(Money),
}

/// A discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    /// Stored upper-case; matched case-insensitively.
    pub code: String,
    pub discount: CouponDiscount,
    pub active: bool,
    pub usage_count: u32,
    pub min_order_value: Option<Money>,
}

// =============================================================================
// Checkout
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    #[default]
    Delivery,
    Pickup,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Delivery => write!(f, "DELIVERY"),
            DeliveryMethod::Pickup => write!(f, "PICKUP"),
        }
    }
}

/// Lifecycle of an order in the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Delivery,
    Completed,
    Cancelled,
}

/// Order handed to the external order-creation call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub whatsapp: String,
    pub method: DeliveryMethod,
    pub address: Option<String>,
    pub payment_method: String,
    pub total: Money,
    pub items_summary: String,
    /// Full cart, kept for re-printing.
    pub full_details: Vec<CartItem>,
    pub status: OrderStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================
