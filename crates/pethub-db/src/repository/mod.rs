//! # Repository Module
//!
//! Database repository implementations for Pet Control Hub.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service / handler                                                     │
//! │       │                                                                 │
//! │       │  db.customers().get_by_id(3)                                   │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                    │
//! │  ├── get_by_id / get_active                                            │
//! │  ├── list(page)                                                        │
//! │  ├── insert / update                                                   │
//! │  └── find_conflict (uniqueness lookups)                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories hold no business rules: they never normalize,            │
//! │  never decide 409 vs 404, and never open transactions.                 │
//! │  Writes that join a transaction take `&mut SqliteConnection`.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Semantics
//! - `get_by_id` returns inactive rows too (historical references)
//! - `get_active` and every listing only see `is_active = 1`

pub mod booking;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod inventory;
pub mod pet;
pub mod sale;
pub mod vaccine;

pub use booking::BookingRepository;
pub use customer::CustomerRepository;
pub use dashboard::DashboardRepository;
pub use employee::EmployeeRepository;
pub use inventory::InventoryRepository;
pub use pet::PetRepository;
pub use sale::SaleRepository;
pub use vaccine::VaccineRepository;

use chrono::Utc;
use pethub_core::EntityKind;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Marks a row inactive.
///
/// Fails with `NotFound` when the row does not exist or is already
/// inactive, so a second delete of the same id is reported.
pub async fn soft_delete(pool: &SqlitePool, kind: EntityKind, id: i64) -> DbResult<()> {
    debug!(entity = %kind, id, "Soft-deleting row");

    // Table names come from a closed enum, never from input.
    let sql = format!(
        "UPDATE {} SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        kind.table()
    );

    let result = sqlx::query(&sql)
        .bind(id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(kind.label(), id));
    }

    Ok(())
}

/// Builds a `LIKE` pattern matching `term` anywhere, with the wildcards in
/// `term` escaped. Use with `LIKE ? ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
