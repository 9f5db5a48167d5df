//! # Employee Routes

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{checked_page, soft_delete};
use crate::state::AppState;
use pethub_core::{Employee, EmployeePatch, EntityKind, NewEmployee, Page};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
}

async fn create_employee(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = state.db.identity().register_employee(input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn list_employees(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state.db.employees().list(checked_page(page)?).await?;
    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Employee>, ApiError> {
    state
        .db
        .employees()
        .get_active(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee", id))
}

async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<EmployeePatch>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.db.coordinator().update_employee(id, patch).await?))
}

async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Employee, id).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_employee_cpf_is_unique() {
        let app = test_app().await;
        let carlos = json!({
            "name": "Carlos",
            "job_title": "Tosador",
            "phone": "(21) 3333-4444",
            "tax_id": "123.456.789-09"
        });

        let (status, created) = call(&app, Method::POST, "/api/employees", Some(carlos.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["tax_id"], "12345678909");

        let (status, body) = call(&app, Method::POST, "/api/employees", Some(carlos)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_EMPLOYEE");

        let uri = format!("/api/employees/{}", created["id"]);
        let (status, body) = call(&app, Method::PATCH, &uri, Some(json!({ "job_title": "Gerente" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_title"], "Gerente");
        assert_eq!(body["name"], "Carlos");

        let (status, body) = call(&app, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = test_app().await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({ "name": "Sem CPF", "job_title": "Tosador", "phone": "21333344445" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }
}
