//! # Validation Module
//!
//! Input validation utilities for Pet Control Hub.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Query string parsing                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + normalize                                      │
//! │  ├── Names, quantities, prices, pagination                             │
//! │  └── Phone / CPF rules                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  ├── Partial UNIQUE indexes on active rows                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pethub_core::validation::{validate_name, validate_quantity};
//!
//! let name = validate_name("name", "  Rex  ").unwrap();
//! assert_eq!(name, "Rex");
//!
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Page;
use crate::{MAX_NAME_LENGTH, MAX_PAGE_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name-like field and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use pethub_core::validation::validate_name;
///
/// assert!(validate_name("product_name", "Dog Shampoo").is_ok());
/// assert!(validate_name("product_name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional free-text field; blank becomes `None`.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > 255 => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 255,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validates a search term.
///
/// ## Rules
/// - Must not be empty (searching for nothing is a client error)
/// - Maximum 100 characters
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    validate_name("name", term)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a non-negative counter (stock quantity, low-stock threshold).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, courtesy sales)
///
/// ## Example
/// ```rust
/// use pethub_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("unit_price_cents", 1099).is_ok());
/// assert!(validate_price_cents("unit_price_cents", 0).is_ok());
/// assert!(validate_price_cents("unit_price_cents", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)
}

/// Validates pagination parameters.
///
/// ## Rules
/// - `skip` >= 0
/// - `limit` in 1..=500
pub fn validate_page(page: &Page) -> ValidationResult<()> {
    validate_non_negative("skip", page.skip)?;

    if page.limit < 1 || page.limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_PAGE_LIMIT,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Ana Souza ").unwrap(), "Ana Souza");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(101)).is_err());
        assert!(validate_name("name", &"A".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_name_reports_field() {
        match validate_name("service_name", "") {
            Err(ValidationError::Required { field }) => assert_eq!(field, "service_name"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("address", None).unwrap(), None);
        assert_eq!(validate_optional_text("address", Some("  ")).unwrap(), None);
        assert_eq!(
            validate_optional_text("address", Some(" Rua A, 10 ")).unwrap(),
            Some("Rua A, 10".to_string())
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("total_value_cents", 0).is_ok());
        assert!(validate_price_cents("total_value_cents", -1).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(&Page::default()).is_ok());
        assert!(validate_page(&Page { skip: 0, limit: 500 }).is_ok());
        assert!(validate_page(&Page { skip: -1, limit: 10 }).is_err());
        assert!(validate_page(&Page { skip: 0, limit: 0 }).is_err());
        assert!(validate_page(&Page { skip: 0, limit: 501 }).is_err());
    }
}
