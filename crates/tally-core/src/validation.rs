//! # Validation Module
//!
//! Input validation for products and invoice requests.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request shape (serde)                                         │
//! │  └── Types, required fields, enum values                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Field rules (empty, length, sign)                                 │
//! │  └── Runs before any store access                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK (stock_quantity >= 0)                                       │
//! │  ├── UNIQUE (sku), UNIQUE (invoice_number)                             │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("WID-001").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{DEFAULT_CUSTOMER_NAME, MAX_CUSTOMER_NAME_LEN, MAX_LINE_QUANTITY, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 50;
const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Product Fields
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_sku;
///
/// assert!(validate_sku("WID-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price_cents;
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

pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Invoice Request Fields
// =============================================================================

/// Validates a requested line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_LINE_QUANTITY`]
///
/// ```text
/// validate_quantity(q)
///      │
///      ├── q <= 0 ─────────────────► MustBePositive
///      ├── q > MAX_LINE_QUANTITY ──► OutOfRange
///      │
///      └── OK ─────────────────────► stock check (aggregated per product)
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Normalizes a customer name.
///
/// Missing or blank names become the walk-in default; anything else is
/// trimmed and length-checked.
///
/// ## Example
/// ```rust
/// use tally_core::validation::normalize_customer_name;
///
/// assert_eq!(normalize_customer_name(None).unwrap(), "Walk-in Customer");
/// assert_eq!(normalize_customer_name(Some("  ")).unwrap(), "Walk-in Customer");
/// assert_eq!(normalize_customer_name(Some(" Acme ")).unwrap(), "Acme");
/// ```
pub fn normalize_customer_name(name: Option<&str>) -> ValidationResult<String> {
    let name = name.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        return Ok(DEFAULT_CUSTOMER_NAME.to_string());
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Normalizes invoice notes. Missing notes become an empty string.
pub fn normalize_notes(notes: Option<&str>) -> ValidationResult<String> {
    let notes = notes.map(str::trim).unwrap_or_default();

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(notes.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("WID-001").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Steel Bracket 40mm").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(MAX_LINE_QUANTITY + 1),
            Err(ValidationError::OutOfRange { max, .. }) if max == MAX_LINE_QUANTITY
        ));
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-100).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_customer_name_defaults_and_limits() {
        assert_eq!(normalize_customer_name(None).unwrap(), DEFAULT_CUSTOMER_NAME);
        assert_eq!(normalize_customer_name(Some("")).unwrap(), DEFAULT_CUSTOMER_NAME);
        assert_eq!(normalize_customer_name(Some("Jane Doe")).unwrap(), "Jane Doe");

        let too_long = "x".repeat(MAX_CUSTOMER_NAME_LEN + 1);
        assert!(matches!(
            normalize_customer_name(Some(&too_long)),
            Err(ValidationError::TooLong { max, .. }) if max == MAX_CUSTOMER_NAME_LEN
        ));
    }

    #[test]
    fn test_notes_defaults_and_limits() {
        assert_eq!(normalize_notes(None).unwrap(), "");
        assert_eq!(normalize_notes(Some(" net 30 ")).unwrap(), "net 30");
        assert!(normalize_notes(Some(&"n".repeat(MAX_NOTES_LEN))).is_ok());
        assert!(normalize_notes(Some(&"n".repeat(MAX_NOTES_LEN + 1))).is_err());
    }
}
