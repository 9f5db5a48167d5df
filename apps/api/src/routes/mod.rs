//! # HTTP Routes
//!
//! Every handler is a thin translation: extract, call a pethub-db
//! repository or service, wrap the result.
//!
//! ## Route Organization
//! ```text
//! routes/
//! ├── mod.rs        ◄─── You are here (router assembly, shared helpers)
//! ├── customers.rs  ◄─── /api/customers, search
//! ├── employees.rs  ◄─── /api/employees
//! ├── pets.rs       ◄─── /api/pets, /api/pets/{id}/vaccines, /api/vaccines
//! ├── inventory.rs  ◄─── /api/inventory
//! ├── sales.rs      ◄─── /api/sales
//! ├── bookings.rs   ◄─── /api/bookings
//! ├── dashboard.rs  ◄─── /api/dashboard, /api/schedule
//! └── health.rs     ◄─── /health
//! ```
//!
//! ## Status Codes
//! - `POST` creating a person, pet, item or vaccine: 201
//! - `POST /api/sales`, `POST /api/bookings`: 200
//! - `DELETE`: 204, second delete of the same row: 404
//! - Errors: see [`crate::error`]

pub mod bookings;
pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod inventory;
pub mod pets;
pub mod sales;

use axum::http::StatusCode;
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;
use pethub_core::validation::validate_page;
use pethub_core::{EntityKind, Page};

/// Every `/api` route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(customers::routes())
        .merge(employees::routes())
        .merge(pets::routes())
        .merge(inventory::routes())
        .merge(sales::routes())
        .merge(bookings::routes())
        .merge(dashboard::routes())
}

/// Rejects out-of-range `skip` / `limit`.
pub(crate) fn checked_page(page: Page) -> Result<Page, ApiError> {
    validate_page(&page)?;
    Ok(page)
}

/// Shared body of every `DELETE` handler.
pub(crate) async fn soft_delete(
    state: &AppState,
    kind: EntityKind,
    id: i64,
) -> Result<StatusCode, ApiError> {
    state.db.coordinator().soft_delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
