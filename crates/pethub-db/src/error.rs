//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        Business rule (CoreError)           │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← categorized / wrapped unchanged               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/api) ← status code + {code, message}                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HTTP client                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pethub_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// Services return business-rule failures as [`DbError::Core`] so callers
/// only ever handle one error type.
#[derive(Debug, Error)]
pub enum DbError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    /// - Soft-deleted record where only active rows qualify
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Two writers race past the pre-insert uniqueness check
    /// - Any partial UNIQUE index on active rows fires
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when this is a UNIQUE violation on the given table.
    ///
    /// `field` is reported by SQLite as `table.column[, table.column]`.
    pub fn is_unique_violation_on(&self, table: &str) -> bool {
        match self {
            DbError::UniqueViolation { field, .. } => field
                .split(", ")
                .any(|col| col.split('.').next() == Some(table)),
            _ => false,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → by error kind (unique / foreign key / other)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if db_err.is_unique_violation() {
                    // "UNIQUE constraint failed: <table>.<column>[, <table>.<column>]"
                    let field = msg
                        .split("constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<pethub_core::ValidationError> for DbError {
    fn from(err: pethub_core::ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_unique_violation_table_match() {
        let err = DbError::duplicate("bookings.employee_id, bookings.scheduled_time", "unknown");
        assert!(err.is_unique_violation_on("bookings"));
        assert!(!err.is_unique_violation_on("customers"));

        let err = DbError::not_found("Customer", 1);
        assert!(!err.is_unique_violation_on("customers"));
    }

    #[tokio::test]
    async fn test_constraint_errors_are_categorized() {
        let db = testing::database().await;
        let ana = testing::customer(&db, "Ana").await;

        let duplicate_phone: DbError = sqlx::query(
            "INSERT INTO customers (name, phone, tax_id, created_at, updated_at)
             VALUES ('Bia', ?1, '00000000000', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
        )
        .bind(&ana.phone)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(duplicate_phone.is_unique_violation_on("customers"));
        assert!(matches!(
            &duplicate_phone,
            DbError::UniqueViolation { field, .. } if field == "customers.phone"
        ));

        let orphan_pet: DbError = sqlx::query(
            "INSERT INTO pets (name, breed, species, customer_id, created_at, updated_at)
             VALUES ('Rex', 'SRD', 'Cachorro', 999, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(matches!(orphan_pet, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: DbError = CoreError::ProductNotFound("#9".to_string()).into();
        assert_eq!(err.to_string(), "Product not found in inventory: #9");
    }
}
