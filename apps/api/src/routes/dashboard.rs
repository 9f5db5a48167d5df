//! # Dashboard Routes
//!
//! ```text
//! GET /api/dashboard          200  {total_revenue_cents, total_sales, total_bookings, total_customers}
//! GET /api/schedule?date=     200  bookings of the day (UTC, default today)
//! ```

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;
use pethub_core::{DashboardKpis, ScheduleEntry};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/schedule", get(schedule))
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardKpis>, ApiError> {
    Ok(Json(state.db.dashboard().kpis().await?))
}

async fn schedule(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    let day = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.db.bookings().list_for_day(day).await?))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        call, create_customer, create_employee, create_item, create_pet, test_app,
    };
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_dashboard_is_zero() {
        let app = test_app().await;

        let (status, body) = call(&app, Method::GET, "/api/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "total_revenue_cents": 0,
                "total_sales": 0,
                "total_bookings": 0,
                "total_customers": 0
            })
        );
    }

    #[tokio::test]
    async fn test_dashboard_counts_active_rows() {
        let app = test_app().await;
        let ana = create_customer(&app, "Ana", 1).await;
        create_customer(&app, "Bruno", 2).await;
        let toy = create_item(&app, "Bolinha", 10, 990).await;

        let mut sale_ids = Vec::new();
        for qty in [1, 2] {
            let (_, sale) = call(
                &app,
                Method::POST,
                "/api/sales",
                Some(json!({ "product_id": toy, "quantity": qty, "customer_id": ana })),
            )
            .await;
            sale_ids.push(sale["id"].clone());
        }
        call(&app, Method::DELETE, &format!("/api/sales/{}", sale_ids[0]), None).await;

        let (_, body) = call(&app, Method::GET, "/api/dashboard", None).await;

        assert_eq!(body["total_sales"], 1);
        assert_eq!(body["total_revenue_cents"], 1980);
        assert_eq!(body["total_customers"], 2);
        assert_eq!(body["total_bookings"], 0);
    }

    #[tokio::test]
    async fn test_schedule_for_today_and_given_day() {
        let app = test_app().await;
        let owner = create_customer(&app, "Ana", 1).await;
        let rex = create_pet(&app, "Rex", owner).await;
        let carlos = create_employee(&app, "Carlos", 2).await;

        let today = Utc::now().date_naive();
        let tomorrow = today + Duration::days(1);
        for (day, service) in [(today, "Banho"), (tomorrow, "Tosa")] {
            let (status, _) = call(
                &app,
                Method::POST,
                "/api/bookings",
                Some(json!({
                    "service_name": service,
                    "scheduled_time": format!("{}T12:00:00Z", day),
                    "pet_id": rex,
                    "employee_id": carlos
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(&app, Method::GET, "/api/schedule", None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["service_name"], "Banho");
        assert_eq!(entries[0]["pet"]["name"], "Rex");
        assert_eq!(entries[0]["employee"]["name"], "Carlos");

        let uri = format!("/api/schedule?date={}", tomorrow);
        let (_, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(body[0]["service_name"], "Tosa");

        let (status, _) = call(&app, Method::GET, "/api/schedule?date=ontem", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
