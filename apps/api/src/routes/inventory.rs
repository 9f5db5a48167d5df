//! # Inventory Routes
//!
//! ```text
//! POST   /api/inventory                                  201
//! GET    /api/inventory?low_stock=&name=&skip=&limit=    200  ordered by name
//! GET    /api/inventory/{id}                             200
//! PATCH  /api/inventory/{id}                             200  quantity is a recount
//! DELETE /api/inventory/{id}                             204
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::soft_delete;
use crate::state::AppState;
use pethub_core::{
    EntityKind, InventoryFilter, InventoryItem, InventoryItemPatch, NewInventoryItem, Page,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_item))
        .route(
            "/inventory/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
}

/// Query string of the inventory listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InventoryQuery {
    pub low_stock: bool,
    pub name: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl InventoryQuery {
    fn split(self) -> (InventoryFilter, Page) {
        let defaults = Page::default();
        let page = Page {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
        };
        let filter = InventoryFilter {
            low_stock_only: self.low_stock,
            name_contains: self.name,
        };
        (filter, page)
    }
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewInventoryItem>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let item = state.db.ledger().create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_inventory(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<InventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let (filter, page) = query.split();
    Ok(Json(state.db.ledger().list(&filter, page).await?))
}

async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(state.db.ledger().get(id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<InventoryItemPatch>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(state.db.coordinator().update_inventory_item(id, patch).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::InventoryItem, id).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, create_item, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_filter() {
        let app = test_app().await;
        create_item(&app, "Ração Premium", 50, 18990).await;
        create_item(&app, "Ração Filhote", 2, 9990).await;
        create_item(&app, "Coleira", 5, 2500).await;

        let (status, body) = call(&app, Method::GET, "/api/inventory?low_stock=true", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["product_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Coleira", "Ração Filhote"]);

        let (_, body) = call(&app, Method::GET, "/api/inventory?name=premium&limit=10", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::GET, "/api/inventory?limit=1000", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_name_and_recount() {
        let app = test_app().await;
        let id = create_item(&app, "Coleira", 5, 2500).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/inventory",
            Some(json!({ "product_name": "Coleira", "quantity": 1, "unit_price_cents": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_PRODUCT");

        let uri = format!("/api/inventory/{}", id);
        let (status, body) = call(&app, Method::PATCH, &uri, Some(json!({ "quantity": 40 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity"], 40);
        assert_eq!(body["unit_price_cents"], 2500);

        let (status, _) = call(&app, Method::PATCH, &uri, Some(json!({ "quantity": -1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
