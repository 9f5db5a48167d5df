//! # Booking Routes
//!
//! ```text
//! POST   /api/bookings             200  409 when the employee is taken
//! GET    /api/bookings?skip&limit  200
//! GET    /api/bookings/{id}        200
//! PATCH  /api/bookings/{id}        200  slot rechecked when time/employee move
//! DELETE /api/bookings/{id}        204  frees the slot
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{checked_page, soft_delete};
use crate::state::AppState;
use pethub_core::{Booking, BookingPatch, EntityKind, NewBooking, Page};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).patch(update_booking).delete(delete_booking),
        )
}

async fn create_booking(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewBooking>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.db.coordinator().create_booking(input).await?))
}

async fn list_bookings(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.db.bookings().list(checked_page(page)?).await?))
}

async fn get_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Booking>, ApiError> {
    state
        .db
        .bookings()
        .get_active(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking", id))
}

async fn update_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<BookingPatch>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.db.coordinator().update_booking(id, patch).await?))
}

async fn delete_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Booking, id).await
}
