//! # API Error Type
//!
//! Unified error type for HTTP handlers. This is the only place where a
//! status code is chosen.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pet Control Hub                        │
//! │                                                                         │
//! │  Handler ── Result<T, ApiError>                                         │
//! │     │                                                                   │
//! │     ├── ValidationError / InvalidPhone / InvalidTaxId  → 400           │
//! │     ├── InsufficientStock                              → 400           │
//! │     ├── NotFound / ProductNotFound                     → 404           │
//! │     ├── Duplicate* / SlotConflict / UniqueViolation    → 409           │
//! │     └── anything from storage                          → 500           │
//! │                                (logged, generic message)               │
//! │                                                                         │
//! │  Body: { "code": "SLOT_CONFLICT",                                      │
//! │          "message": "Employee #2 already has a booking at ..." }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use pethub_core::{CoreError, ValidationError};
use pethub_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed body, query or path (400)
    InvalidRequest,

    /// Input validation failed (400)
    ValidationError,

    /// Phone empty or under 10 digits (400)
    InvalidPhone,

    /// CPF failed the checksum (400)
    InvalidTaxId,

    /// Not enough units to sell (400)
    InsufficientStock,

    /// Reference to a row that does not exist (400)
    InvalidReference,

    /// Resource missing or inactive (404)
    NotFound,

    /// Product named by a sale is missing or inactive (404)
    ProductNotFound,

    /// Phone or CPF owned by another active customer (409)
    DuplicateCustomer,

    /// CPF owned by another active employee (409)
    DuplicateEmployee,

    /// Product name used by another active item (409)
    DuplicateProduct,

    /// Employee already booked at that instant (409)
    SlotConflict,

    /// Storage-level uniqueness violation (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequest
            | ErrorCode::ValidationError
            | ErrorCode::InvalidPhone
            | ErrorCode::InvalidTaxId
            | ErrorCode::InsufficientStock
            | ErrorCode::InvalidReference => StatusCode::BAD_REQUEST,

            ErrorCode::NotFound | ErrorCode::ProductNotFound => StatusCode::NOT_FOUND,

            ErrorCode::DuplicateCustomer
            | ErrorCode::DuplicateEmployee
            | ErrorCode::DuplicateProduct
            | ErrorCode::SlotConflict
            | ErrorCode::Conflict => StatusCode::CONFLICT,

            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => core.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                warn!(%field, "Unique constraint rejected write");
                ApiError::new(ErrorCode::Conflict, format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                warn!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::InvalidReference, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::InvalidPhone { .. } => ErrorCode::InvalidPhone,
            CoreError::InvalidTaxId { .. } => ErrorCode::InvalidTaxId,
            CoreError::DuplicateCustomer { .. } => ErrorCode::DuplicateCustomer,
            CoreError::DuplicateEmployee { .. } => ErrorCode::DuplicateEmployee,
            CoreError::DuplicateProduct { .. } => ErrorCode::DuplicateProduct,
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::SlotConflict { .. } => ErrorCode::SlotConflict,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
