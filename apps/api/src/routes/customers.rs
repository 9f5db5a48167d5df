//! # Customer Routes
//!
//! ```text
//! POST   /api/customers              201  register (phone + CPF normalized)
//! GET    /api/customers?skip&limit   200  active customers
//! GET    /api/customers/search?name  200  [{id, name}], 404 when empty
//! GET    /api/customers/{id}         200
//! PATCH  /api/customers/{id}         200
//! DELETE /api/customers/{id}         204
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{checked_page, soft_delete};
use crate::state::AppState;
use pethub_core::validation::validate_search_term;
use pethub_core::{
    Customer, CustomerPatch, CustomerSummary, EntityKind, NewCustomer, Page, DEFAULT_PAGE_LIMIT,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/search", get(search_customers))
        .route(
            "/customers/{id}",
            get(get_customer).patch(update_customer).delete(delete_customer),
        )
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

async fn create_customer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.db.identity().register_customer(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.db.customers().list(checked_page(page)?).await?;
    Ok(Json(customers))
}

/// Name search for the sale and booking forms.
async fn search_customers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<CustomerSummary>>, ApiError> {
    let term = validate_search_term(&query.name)?;
    let found = state
        .db
        .customers()
        .search_by_name(&term, DEFAULT_PAGE_LIMIT)
        .await?;

    debug!(term = %term, count = found.len(), "Customer search");

    if found.is_empty() {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("No customer found matching '{}'", term),
        ));
    }

    Ok(Json(found))
}

async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Customer>, ApiError> {
    state
        .db
        .customers()
        .get_active(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer", id))
}

async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.db.coordinator().update_customer(id, patch).await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Customer, id).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn ana() -> serde_json::Value {
        json!({
            "name": "Ana Souza",
            "phone": "(21) 99999-0000",
            "address": "Rua A, 10",
            "tax_id": "529.982.247-25"
        })
    }

    #[tokio::test]
    async fn test_register_normalizes_and_returns_201() {
        let app = test_app().await;

        let (status, body) = call(&app, Method::POST, "/api/customers", Some(ana())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phone"], "21999990000");
        assert_eq!(body["tax_id"], "52998224725");
        assert_eq!(body["is_active"], true);
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_identity() {
        let app = test_app().await;
        call(&app, Method::POST, "/api/customers", Some(ana())).await;

        let same_phone = json!({
            "name": "Bruno",
            "phone": "21999990000",
            "tax_id": "111.444.777-35"
        });
        let (status, body) = call(&app, Method::POST, "/api/customers", Some(same_phone)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_CUSTOMER");
        assert!(body["message"].as_str().unwrap().contains("Ana Souza"));

        let bad_cpf = json!({
            "name": "Carla",
            "phone": "11988887777",
            "tax_id": "111.111.111-11"
        });
        let (status, body) = call(&app, Method::POST, "/api/customers", Some(bad_cpf)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_TAX_ID");

        let short_phone = json!({
            "name": "Carla",
            "phone": "9999",
            "tax_id": "111.444.777-35"
        });
        let (status, body) = call(&app, Method::POST, "/api/customers", Some(short_phone)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PHONE");
    }

    #[tokio::test]
    async fn test_search_returns_summaries_or_404() {
        let app = test_app().await;
        call(&app, Method::POST, "/api/customers", Some(ana())).await;

        let (status, body) = call(&app, Method::GET, "/api/customers/search?name=souza", None).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Ana Souza");
        assert!(rows[0].get("phone").is_none());

        let (status, body) = call(&app, Method::GET, "/api/customers/search?name=zzz", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = call(&app, Method::GET, "/api/customers/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_and_delete() {
        let app = test_app().await;
        let (_, created) = call(&app, Method::POST, "/api/customers", Some(ana())).await;
        let uri = format!("/api/customers/{}", created["id"]);

        let (status, body) = call(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "address": "Av. Atlântica, 500" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "Av. Atlântica, 500");
        assert_eq!(body["phone"], "21999990000");

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Phone and CPF are free again
        let (status, _) = call(&app, Method::POST, "/api/customers", Some(ana())).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let app = test_app().await;

        let (status, body) = call(&app, Method::GET, "/api/customers?limit=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = call(&app, Method::GET, "/api/customers?skip=0&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }
}
