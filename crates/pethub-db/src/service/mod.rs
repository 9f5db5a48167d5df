//! # Service Module
//!
//! Business rules that need to read or write the database.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Services                                        │
//! │                                                                         │
//! │  TransactionCoordinator ── create_sale, create_booking, update_*,       │
//! │       │                    soft_delete                                  │
//! │       │                                                                 │
//! │       ├──► IdentityRegistry   one active customer per phone and CPF,   │
//! │       │                       one active employee per CPF              │
//! │       ├──► InventoryLedger    item creation, conditional debit         │
//! │       └──► SchedulingGuard    one active booking per employee + time   │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │              Repositories (SQL only)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Rules
//! - Validation reads (existence, uniqueness, slot pre-checks) run before a
//!   transaction is opened.
//! - Every transaction starts with its write, so SQLite hands out the write
//!   lock first and a waiting writer never works from a stale snapshot.
//! - Partial unique indexes catch what slips between check and insert; the
//!   resulting violation is translated back into the business error.

pub mod coordinator;
pub mod identity;
pub mod ledger;
pub mod scheduling;

pub use coordinator::TransactionCoordinator;
pub use identity::IdentityRegistry;
pub use ledger::InventoryLedger;
pub use scheduling::SchedulingGuard;

use crate::error::DbError;

/// Maps a transaction begin/commit failure.
pub(crate) fn transaction_failed(err: sqlx::Error) -> DbError {
    DbError::TransactionFailed(err.to_string())
}
