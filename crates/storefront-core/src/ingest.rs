//! # Ingestion
//!
//! Converts raw backend rows into domain types.
//!
//! The backend stores snake_case rows with optional flags and decimal prices.
//! This is the only place where those are interpreted:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend row                      Domain value                          │
//! │  ───────────                      ────────────                          │
//! │  active: null          ────────►  active: true                          │
//! │  price: 3.5            ────────►  Money(350)                            │
//! │  option price: null    ────────►  Money(0)                              │
//! │  product_group_relations ──────►  group_ids (relation order)            │
//! │  type: "percent", 10   ────────►  CouponDiscount::Percent(1000 bps)     │
//! │  min_order_value: 0    ────────►  None (no minimum)                     │
//! │  closed_message: null  ────────►  "🔴 Loja Fechada"                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A bad row is skipped and reported; it never takes the rest of the
//! snapshot down with it. Opening-hour entries count as rows too: a
//! malformed entry or a repeated day is dropped and the schedule keeps the
//! rest. The settings row itself is the exception: without a valid status
//! mode and fee the store cannot decide whether it is open.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::coupon::normalize_code;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    Category, Coupon, CouponDiscount, DiscountRate, OpeningHour, Product, ProductGroup,
    ProductOption, StoreSettings, StoreStatusMode,
};
use crate::validation::{
    validate_coupon_code, validate_group_bounds, validate_opening_hour, validate_price_cents,
    ValidationResult,
};

pub const DEFAULT_CLOSED_MESSAGE: &str = "🔴 Loja Fechada";
pub const DEFAULT_OPEN_MESSAGE: &str = "🟢 Aberto até às 23:00";
pub const DEFAULT_DELIVERY_TIME: &str = "40min à 1h";
pub const DEFAULT_PICKUP_TIME: &str = "20min à 45min";

// =============================================================================
// Row Types
// =============================================================================

/// `settings` row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsRow {
    pub store_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub store_status: Option<String>,
    pub delivery_fee: Option<f64>,
    /// Stored as JSON in the camelCase shape of [`OpeningHour`].
    #[serde(default)]
    pub opening_hours: Vec<OpeningHour>,
    pub closed_message: Option<String>,
    pub open_message: Option<String>,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
}

/// `categories` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

/// `product_group_relations` entry embedded in a product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRelationRow {
    pub group_id: String,
}

/// `products` row with its group relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category_id: Option<String>,
    #[serde(default)]
    pub product_group_relations: Option<Vec<GroupRelationRow>>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

/// `product_options` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRow {
    pub id: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// `product_groups` row with its options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRow {
    pub id: String,
    pub title: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(default)]
    pub options: Option<Vec<OptionRow>>,
    pub active: Option<bool>,
}

/// `coupons` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRow {
    pub id: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub active: Option<bool>,
    pub usage_count: Option<i64>,
    pub min_order_value: Option<f64>,
}

/// Everything the storefront reads from the backend, as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub settings: SettingsRow,
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
    #[serde(default)]
    pub products: Vec<ProductRow>,
    #[serde(default)]
    pub groups: Vec<GroupRow>,
    #[serde(default)]
    pub coupons: Vec<CouponRow>,
}

// =============================================================================
// Domain Snapshot
// =============================================================================

/// Validated store data the storefront runs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub settings: StoreSettings,
    pub catalog: Catalog,
    pub coupons: Vec<Coupon>,
}

/// A row left out of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub table: String,
    pub id: String,
    pub reason: String,
}

impl Snapshot {
    /// Converts every row, collecting the ones that fail.
    ///
    /// ## Returns
    /// - `Err` only when the settings row is unusable
    /// - otherwise the snapshot plus the skipped rows
    pub fn into_store(self) -> CoreResult<(StoreSnapshot, Vec<SkippedRow>)> {
        let mut skipped = Vec::new();

        let mut settings_row = self.settings;
        settings_row.opening_hours =
            usable_opening_hours(std::mem::take(&mut settings_row.opening_hours), &mut skipped);
        let settings = StoreSettings::try_from(settings_row)?;

        let categories = convert_all("categories", self.categories, |r| r.id.clone(), &mut skipped);
        let products = convert_all("products", self.products, |r| r.id.clone(), &mut skipped);
        let groups = convert_all("product_groups", self.groups, |r| r.id.clone(), &mut skipped);
        let coupons = convert_all("coupons", self.coupons, |r| r.id.clone(), &mut skipped);

        let snapshot = StoreSnapshot {
            settings,
            catalog: Catalog::new(categories, products, groups),
            coupons,
        };
        Ok((snapshot, skipped))
    }
}

fn convert_all<R, T>(
    table: &str,
    rows: Vec<R>,
    id_of: impl Fn(&R) -> String,
    skipped: &mut Vec<SkippedRow>,
) -> Vec<T>
where
    T: TryFrom<R, Error = ValidationError>,
{
    rows.into_iter()
        .filter_map(|row| {
            let id = id_of(&row);
            T::try_from(row)
                .map_err(|e| {
                    skipped.push(SkippedRow {
                        table: table.to_string(),
                        id,
                        reason: e.to_string(),
                    })
                })
                .ok()
        })
        .collect()
}

/// Keeps the valid entries, first one per day, and reports the rest.
fn usable_opening_hours(hours: Vec<OpeningHour>, skipped: &mut Vec<SkippedRow>) -> Vec<OpeningHour> {
    let mut seen = HashSet::new();

    hours
        .into_iter()
        .filter(|entry| {
            let checked = validate_opening_hour(entry).and_then(|()| {
                if seen.insert(entry.day_of_week) {
                    Ok(())
                } else {
                    Err(ValidationError::Duplicate {
                        field: "dayOfWeek".to_string(),
                        value: entry.day_of_week.to_string(),
                    })
                }
            });

            match checked {
                Ok(()) => true,
                Err(e) => {
                    skipped.push(SkippedRow {
                        table: "opening_hours".to_string(),
                        id: entry.day_of_week.to_string(),
                        reason: e.to_string(),
                    });
                    false
                }
            }
        })
        .collect()
}

// =============================================================================
// Conversions
// =============================================================================

fn required(field: &str, value: Option<String>) -> ValidationResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

fn price(value: f64) -> ValidationResult<Money> {
    let money = Money::from_decimal(value);
    validate_price_cents(money.cents())?;
    Ok(money)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<SettingsRow> for StoreSettings {
    type Error = ValidationError;

    fn try_from(row: SettingsRow) -> ValidationResult<Self> {
        let store_status = match row.store_status {
            Some(s) => s.parse()?,
            None => StoreStatusMode::Auto,
        };
        let whatsapp_number: String = row
            .whatsapp_number
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        Ok(StoreSettings {
            store_name: row.store_name.unwrap_or_default(),
            whatsapp_number,
            store_status,
            delivery_fee: price(row.delivery_fee.unwrap_or(0.0))?,
            opening_hours: row.opening_hours,
            closed_message: non_empty(row.closed_message)
                .unwrap_or_else(|| DEFAULT_CLOSED_MESSAGE.to_string()),
            open_message: non_empty(row.open_message)
                .unwrap_or_else(|| DEFAULT_OPEN_MESSAGE.to_string()),
            delivery_time: Some(
                non_empty(row.delivery_time).unwrap_or_else(|| DEFAULT_DELIVERY_TIME.to_string()),
            ),
            pickup_time: Some(
                non_empty(row.pickup_time).unwrap_or_else(|| DEFAULT_PICKUP_TIME.to_string()),
            ),
        })
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = ValidationError;

    fn try_from(row: CategoryRow) -> ValidationResult<Self> {
        Ok(Category {
            title: required("title", row.title)?,
            id: row.id,
            icon: non_empty(row.icon),
            display_order: row.display_order,
            active: row.active.unwrap_or(true),
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = ValidationError;

    fn try_from(row: ProductRow) -> ValidationResult<Self> {
        let amount = row.price.ok_or_else(|| ValidationError::Required {
            field: "price".to_string(),
        })?;

        Ok(Product {
            name: required("name", row.name)?,
            price: price(amount)?,
            category_id: required("category_id", row.category_id)?,
            group_ids: row
                .product_group_relations
                .unwrap_or_default()
                .into_iter()
                .map(|r| r.group_id)
                .collect(),
            id: row.id,
            description: non_empty(row.description),
            image: non_empty(row.image),
            display_order: row.display_order,
            active: row.active.unwrap_or(true),
        })
    }
}

impl TryFrom<OptionRow> for ProductOption {
    type Error = ValidationError;

    fn try_from(row: OptionRow) -> ValidationResult<Self> {
        Ok(ProductOption {
            name: required("name", row.name)?,
            price: price(row.price.unwrap_or(0.0))?,
            id: row.id,
            description: non_empty(row.description),
            active: row.active.unwrap_or(true),
        })
    }
}

impl TryFrom<GroupRow> for ProductGroup {
    type Error = ValidationError;

    /// Any invalid option fails the whole group.
    fn try_from(row: GroupRow) -> ValidationResult<Self> {
        let min = row.min.unwrap_or(0);
        let max = row.max.ok_or_else(|| ValidationError::Required {
            field: "max".to_string(),
        })?;
        validate_group_bounds(min, max)?;

        let options = row
            .options
            .unwrap_or_default()
            .into_iter()
            .map(ProductOption::try_from)
            .collect::<ValidationResult<Vec<_>>>()?;

        Ok(ProductGroup {
            title: required("title", row.title)?,
            id: row.id,
            min: u32::try_from(min).unwrap_or(u32::MAX),
            max: u32::try_from(max).unwrap_or(u32::MAX),
            options,
            active: row.active.unwrap_or(true),
        })
    }
}

impl TryFrom<CouponRow> for Coupon {
    type Error = ValidationError;

    fn try_from(row: CouponRow) -> ValidationResult<Self> {
        validate_coupon_code(&row.code)?;

        let discount = match row.kind.trim().to_lowercase().as_str() {
            "percent" => {
                if !(0.0..=100.0).contains(&row.value) {
                    return Err(ValidationError::OutOfRange {
                        field: "value".to_string(),
                        min: 0,
                        max: 100,
                    });
                }
                CouponDiscount::Percent(DiscountRate::from_percentage(row.value))
            }
            "fixed" => CouponDiscount::Fixed(price(row.value)?),
            _ => {
                return Err(ValidationError::NotAllowed {
                    field: "type".to_string(),
                    allowed: vec!["percent".into(), "fixed".into()],
                })
            }
        };

        // Zero means "no minimum"
        let min_order_value = match row.min_order_value {
            Some(v) => Some(price(v)?).filter(|m| m.is_positive()),
            None => None,
        };

        Ok(Coupon {
            id: row.id,
            code: normalize_code(&row.code),
            discount,
            active: row.active.unwrap_or(true),
            usage_count: row
                .usage_count
                .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
                .unwrap_or(0),
            min_order_value,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
