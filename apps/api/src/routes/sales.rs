//! # Sale Routes
//!
//! A sale debits stock and records the sale in one transaction; see
//! `TransactionCoordinator::create_sale`.
//!
//! ```text
//! POST   /api/sales                200  product by id or by name
//! GET    /api/sales?skip&limit     200
//! GET    /api/sales/{id}           200
//! DELETE /api/sales/{id}           204  stock is not restored
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{checked_page, soft_delete};
use crate::state::AppState;
use pethub_core::{EntityKind, NewSale, Page, Sale};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale).delete(delete_sale))
}

async fn create_sale(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewSale>,
) -> Result<Json<Sale>, ApiError> {
    Ok(Json(state.db.coordinator().create_sale(input).await?))
}

async fn list_sales(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    Ok(Json(state.db.sales().list(checked_page(page)?).await?))
}

async fn get_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Sale>, ApiError> {
    state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .filter(|s| s.is_active)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

async fn delete_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Sale, id).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, create_customer, create_item, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_sale_debits_stock() {
        let app = test_app().await;
        let ana = create_customer(&app, "Ana", 1).await;
        let ration = create_item(&app, "Ração Premium", 10, 18990).await;

        let (status, sale) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": ration, "quantity": 3, "customer_id": ana })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sale["total_value_cents"], 56970);

        let (_, item) = call(&app, Method::GET, &format!("/api/inventory/{}", ration), None).await;
        assert_eq!(item["quantity"], 7);

        let (status, body) = call(&app, Method::GET, &format!("/api/sales/{}", sale["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product_id"], ration);
    }

    #[tokio::test]
    async fn test_sale_by_name() {
        let app = test_app().await;
        let ana = create_customer(&app, "Ana", 1).await;
        let shampoo = create_item(&app, "Shampoo Neutro", 4, 2990).await;

        let (status, sale) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({
                "product_name": "Shampoo Neutro",
                "quantity": 2,
                "total_value_cents": 5000,
                "customer_id": ana
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(sale["product_id"], shampoo);
        assert_eq!(sale["total_value_cents"], 5000);
    }

    #[tokio::test]
    async fn test_sale_readable_after_customer_and_product_deleted() {
        let app = test_app().await;
        let ana = create_customer(&app, "Ana", 1).await;
        let toy = create_item(&app, "Bolinha", 5, 990).await;
        let (_, sale) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": toy, "quantity": 2, "customer_id": ana })),
        )
        .await;

        let (status, _) = call(&app, Method::DELETE, &format!("/api/customers/{}", ana), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &format!("/api/inventory/{}", toy), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&app, Method::GET, &format!("/api/sales/{}", sale["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["customer_id"], ana);
        assert_eq!(body["product_id"], toy);

        let (status, _) = call(&app, Method::GET, &format!("/api/customers/{}", ana), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sale_errors() {
        let app = test_app().await;
        let ana = create_customer(&app, "Ana", 1).await;
        let toy = create_item(&app, "Bolinha", 2, 990).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": toy, "quantity": 5, "customer_id": ana })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": 999, "quantity": 1, "customer_id": ana })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PRODUCT_NOT_FOUND");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": toy, "quantity": 1, "customer_id": 999 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({ "product_id": toy, "quantity": 0, "customer_id": ana })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, item) = call(&app, Method::GET, &format!("/api/inventory/{}", toy), None).await;
        assert_eq!(item["quantity"], 2);
    }
}
