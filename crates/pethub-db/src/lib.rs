//! # pethub-db: Database Layer for Pet Control Hub
//!
//! This crate provides database access and the transactional business
//! services for Pet Control Hub. It uses SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pet Control Hub Data Flow                           │
//! │                                                                         │
//! │  axum handler (POST /api/sales)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pethub-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────────────────────────────────────────┐ │   │
//! │  │   │ service: TransactionCoordinator                          │ │   │
//! │  │   │   ├── IdentityRegistry   (phone / CPF uniqueness)        │ │   │
//! │  │   │   ├── InventoryLedger    (conditional stock debit)       │ │   │
//! │  │   │   └── SchedulingGuard    (employee slot conflicts)       │ │   │
//! │  │   └───────────────────────────┬──────────────────────────────┘ │   │
//! │  │                               ▼                                │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ customer, pet │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ sale, booking │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (./pethub.db)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//! - [`service`] - Business rules that need the database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pethub_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pethub.db")).await?;
//!
//! let customer = db.identity().register_customer(new_customer).await?;
//! let sale = db.coordinator().create_sale(new_sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    BookingRepository, CustomerRepository, DashboardRepository, EmployeeRepository,
    InventoryRepository, PetRepository, SaleRepository, VaccineRepository,
};
pub use service::{IdentityRegistry, InventoryLedger, SchedulingGuard, TransactionCoordinator};
