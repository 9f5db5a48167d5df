//! Router test harness: a fresh in-memory database per app, plus helpers
//! that create rows through the public endpoints.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pethub_core::normalize::complete_tax_id;
use pethub_db::{Database, DbConfig};

use crate::build_router;
use crate::state::AppState;

pub(crate) async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db), &["http://localhost:3000".to_string()])
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Null` when the body is empty).
pub(crate) async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn tax_id(n: u32) -> String {
    complete_tax_id(&format!("{:09}", 234_000_000 + n)).unwrap()
}

fn phone(n: u32) -> String {
    format!("1197{:07}", n)
}

fn id_of(created: &Value) -> i64 {
    created["id"].as_i64().unwrap()
}

/// `n` keeps phone and CPF distinct between rows of one test.
pub(crate) async fn create_customer(app: &Router, name: &str, n: u32) -> i64 {
    let body = json!({ "name": name, "phone": phone(n), "tax_id": tax_id(n) });
    let (status, created) = call(app, Method::POST, "/api/customers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    id_of(&created)
}

pub(crate) async fn create_employee(app: &Router, name: &str, n: u32) -> i64 {
    let body = json!({
        "name": name,
        "job_title": "Tosador",
        "phone": phone(n),
        "tax_id": tax_id(n)
    });
    let (status, created) = call(app, Method::POST, "/api/employees", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    id_of(&created)
}

pub(crate) async fn create_pet(app: &Router, name: &str, customer_id: i64) -> i64 {
    let body = json!({
        "name": name,
        "breed": "SRD",
        "species": "Cachorro",
        "customer_id": customer_id
    });
    let (status, created) = call(app, Method::POST, "/api/pets", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    id_of(&created)
}

pub(crate) async fn create_item(app: &Router, name: &str, quantity: i64, price_cents: i64) -> i64 {
    let body = json!({
        "product_name": name,
        "quantity": quantity,
        "unit_price_cents": price_cents
    });
    let (status, created) = call(app, Method::POST, "/api/inventory", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    id_of(&created)
}
