//! # pethub-core: Pure Business Logic for Pet Control Hub
//!
//! This crate holds the rules of the pet shop that do not need a database:
//! identity normalization, CPF checksums, money, validation and the domain
//! types every other crate speaks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pet Control Hub Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP JSON API (apps/api, axum)                  │   │
//! │  │   /api/customers  /api/sales  /api/bookings  /api/inventory     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pethub-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ normalize │  │   patch   │  │ validation│  │   │
//! │  │   │ Customer  │  │  phone    │  │ *Patch    │  │   rules   │  │   │
//! │  │   │ Sale ...  │  │  CPF      │  │ apply_to  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   pethub-db (Database Layer)                    │   │
//! │  │     SQLite repositories, ledger, scheduling, transactions       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities and request DTOs (Customer, Sale, Booking, ...)
//! - [`patch`] - Partial-update structs applied field by field
//! - [`money`] - Money type with integer arithmetic (centavos)
//! - [`normalize`] - Phone and CPF normalization, CPF checksum
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pethub_core::normalize::{is_valid_tax_id, normalize_phone, normalize_tax_id};
//!
//! assert_eq!(normalize_phone("(21) 99999-0000"), "21999990000");
//!
//! let cpf = normalize_tax_id("529.982.247-25");
//! assert!(is_valid_tax_id(&cpf));
//! assert!(!is_valid_tax_id("11111111111"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod normalize;
pub mod patch;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use patch::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum digits in a normalized phone number (area code + subscriber).
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum length of names (customer, pet, employee, product, service).
pub const MAX_NAME_LENGTH: usize = 100;

/// Threshold used when an inventory item is created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Page size used when a listing request does not specify `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest page a listing request may ask for.
pub const MAX_PAGE_LIMIT: i64 = 500;
