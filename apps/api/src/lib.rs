//! # Pet Control Hub API
//!
//! JSON-over-HTTP front of the shop: customers, pets, employees,
//! inventory, sales, bookings and the dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          pethub-api                                     │
//! │                                                                         │
//! │  Browser ──► CorsLayer ──► TraceLayer ──► Router                        │
//! │                                             │                           │
//! │                        /health ─────────────┤                           │
//! │                        /api/* ──► routes::* │                           │
//! │                                             ▼                           │
//! │                                  AppState { Database }                  │
//! │                                             │                           │
//! │                                  repositories / services (pethub-db)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure leaves as `{"code": "...", "message": "..."}`; see
//! [`error::ErrorCode`] for the status of each code.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
