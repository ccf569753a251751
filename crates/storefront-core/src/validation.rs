//! # Validation Module
//!
//! Field-level checks for data entering the core: backend rows during
//! ingestion and customer input at checkout.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Backend snapshot rows ──► ingest::TryFrom ──► THIS MODULE              │
//! │                               │                                         │
//! │                               └── failure → row skipped, reported       │
//! │                                                                         │
//! │  Checkout form ──────────► commands::checkout ──► THIS MODULE           │
//! │                               │                                         │
//! │                               └── failure → VALIDATION_ERROR            │
//! │                                                                         │
//! │  Option selection is NOT validated here: it is a boolean gate           │
//! │  (pricing::validate_selection) that keeps the modal open.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_time_of_day, validate_quantity};
//!
//! validate_time_of_day("open", "18:00").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::schedule::parse_minute_of_day;
use crate::types::OpeningHour;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CODE_LEN: usize = 32;
const MAX_NAME_LEN: usize = 120;

// =============================================================================
// Schedule Validators
// =============================================================================

/// Validates an `HH:MM` time of day.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_time_of_day;
///
/// assert!(validate_time_of_day("close", "23:59").is_ok());
/// assert!(validate_time_of_day("close", "24:00").is_ok());
/// assert!(validate_time_of_day("close", "24:01").is_err());
/// assert!(validate_time_of_day("close", "").is_err());
/// ```
pub fn validate_time_of_day(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if parse_minute_of_day(value).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected HH:MM between 00:00 and 24:00".to_string(),
        });
    }

    Ok(())
}

/// Validates a day index (0 = Sunday … 6 = Saturday).
pub fn validate_day_of_week(day: i64) -> ValidationResult<()> {
    if !(0..=6).contains(&day) {
        return Err(ValidationError::OutOfRange {
            field: "day_of_week".to_string(),
            min: 0,
            max: 6,
        });
    }

    Ok(())
}

/// Validates a single opening-hour entry.
///
/// ## Rules
/// - The day index is 0..=6
/// - Enabled entries have parseable open and close times
///
/// Repeated days are a property of the whole schedule and are handled by
/// ingestion, which keeps the first entry per day.
pub fn validate_opening_hour(entry: &OpeningHour) -> ValidationResult<()> {
    validate_day_of_week(i64::from(entry.day_of_week))?;

    if entry.enabled {
        validate_time_of_day("open", &entry.open)?;
        validate_time_of_day("close", &entry.close)?;
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a coupon code as stored by the backend.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 32 characters
///
/// Any characters are accepted; `FRETE-GRATIS` is a valid code.
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free options).
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a group's selection bounds: `0 ≤ min ≤ max`, `max ≥ 1`.
pub fn validate_group_bounds(min: i64, max: i64) -> ValidationResult<()> {
    if min < 0 {
        return Err(ValidationError::OutOfRange {
            field: "min".to_string(),
            min: 0,
            max,
        });
    }

    if max < 1 {
        return Err(ValidationError::MustBePositive {
            field: "max".to_string(),
        });
    }

    if min > max {
        return Err(ValidationError::OutOfRange {
            field: "min".to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Customer Input Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## User Workflow
/// ```text
/// Customer taps + on a cart line
///      │
///      ▼
/// validate_quantity(n)
///      │
///      ├── n <= 0?  → MustBePositive (the cart treats it as removal instead)
///      ├── n > 999? → OutOfRange
///      └── OK → quantity updated
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the customer name typed at checkout.
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("open", "00:00").is_ok());
        assert!(validate_time_of_day("open", "09:05").is_ok());
        assert!(validate_time_of_day("open", "23:59").is_ok());
        assert!(validate_time_of_day("open", "18:00:00").is_ok());

        assert!(matches!(
            validate_time_of_day("open", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_time_of_day("open", "25:00").is_err());
        assert!(validate_time_of_day("open", "12:60").is_err());
        assert!(validate_time_of_day("open", "noon").is_err());
    }

    #[test]
    fn test_validate_day_of_week() {
        assert!(validate_day_of_week(0).is_ok());
        assert!(validate_day_of_week(6).is_ok());
        assert!(validate_day_of_week(7).is_err());
        assert!(validate_day_of_week(-1).is_err());
    }

    #[test]
    fn test_validate_opening_hour() {
        assert!(validate_opening_hour(&OpeningHour::new(5, "18:00", "02:00")).is_ok());

        // Disabled entries may carry placeholder times
        assert!(validate_opening_hour(&OpeningHour::new(2, "", "").disabled()).is_ok());

        assert!(validate_opening_hour(&OpeningHour::new(3, "18h", "23:00")).is_err());
        assert!(validate_opening_hour(&OpeningHour::new(7, "18:00", "23:00")).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("SABOR10").is_ok());
        assert!(validate_coupon_code(" taxazero ").is_ok());
        assert!(validate_coupon_code("FRETE-GRATIS").is_ok());
        assert!(validate_coupon_code("sabor_10 off").is_ok());
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("   ").is_err());
        assert!(validate_coupon_code(&"A".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_group_bounds() {
        assert!(validate_group_bounds(0, 3).is_ok());
        assert!(validate_group_bounds(1, 1).is_ok());
        assert!(validate_group_bounds(2, 1).is_err());
        assert!(validate_group_bounds(-1, 1).is_err());
        assert!(validate_group_bounds(0, 0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Ana Souza ").unwrap(), "Ana Souza");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name(&"x".repeat(200)).is_err());
    }
}
