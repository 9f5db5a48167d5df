//! # Error Types
//!
//! Domain-specific error types for pethub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pethub-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pethub-db errors (separate crate)                                     │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What clients see (code + message + status)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, name, time)
//! 3. Errors are enum variants, never String
//! 4. HTTP status codes are NOT chosen here; the API layer maps kinds

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Phone number is empty or too short after normalization.
    #[error("Invalid phone number '{raw}': {reason}")]
    InvalidPhone { raw: String, reason: String },

    /// CPF failed normalization or checksum validation.
    #[error("Invalid CPF '{raw}'")]
    InvalidTaxId { raw: String },

    /// An active customer already owns the phone or CPF.
    ///
    /// ## When This Occurs
    /// ```text
    /// register "(21) 99999-0000"  →  normalized 21999990000
    ///      │
    ///      ▼
    /// active customer #3 "Ana" has phone 21999990000
    ///      │
    ///      ▼
    /// DuplicateCustomer { id: 3, name: "Ana", field: "phone" }
    /// ```
    #[error("A customer is already registered with this {field}: {name} (#{id})")]
    DuplicateCustomer { id: i64, name: String, field: String },

    /// An active employee already owns the CPF.
    #[error("An employee is already registered with this CPF: {name} (#{id})")]
    DuplicateEmployee { id: i64, name: String },

    /// An active inventory item already uses the product name.
    #[error("Product '{product_name}' already exists (#{id})")]
    DuplicateProduct { id: i64, product_name: String },

    /// Inventory item cannot be found (missing or soft-deleted).
    #[error("Product not found in inventory: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete sale.
    ///
    /// ## When This Occurs
    /// - Selling more units than the ledger currently holds
    /// - A concurrent sale took the last units first
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// The employee already has an active booking at that exact time.
    #[error("Employee #{employee_id} already has a booking at {scheduled_time}")]
    SlotConflict {
        employee_id: i64,
        scheduled_time: String,
    },

    /// Referenced entity is missing or inactive.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are detected before any write happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Dog Shampoo".to_string(),
            available: 0,
            requested: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Dog Shampoo: available 0, requested 1"
        );

        let err = CoreError::DuplicateCustomer {
            id: 3,
            name: "Ana Souza".to_string(),
            field: "phone".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A customer is already registered with this phone: Ana Souza (#3)"
        );
    }

    #[test]
    fn test_slot_conflict_names_the_time() {
        let err = CoreError::SlotConflict {
            employee_id: 7,
            scheduled_time: "2025-03-01T10:00:00+00:00".to_string(),
        };
        assert!(err.to_string().contains("2025-03-01T10:00:00+00:00"));
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_not_found_helper() {
        let err = CoreError::not_found("Customer", 42);
        assert_eq!(err.to_string(), "Customer not found: 42");
    }
}
