//! # Pet and Vaccine Routes
//!
//! ```text
//! POST   /api/pets                 201  owner must be an active customer
//! GET    /api/pets?skip&limit      200
//! GET    /api/pets/{id}            200
//! PATCH  /api/pets/{id}            200
//! DELETE /api/pets/{id}            204
//! GET    /api/pets/{id}/vaccines   200  newest application first
//! POST   /api/pets/{id}/vaccines   201
//! GET    /api/vaccines/{id}        200
//! DELETE /api/vaccines/{id}        204
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{checked_page, soft_delete};
use crate::state::AppState;
use pethub_core::{EntityKind, NewPet, NewVaccine, Page, Pet, PetPatch, Vaccine};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", get(get_pet).patch(update_pet).delete(delete_pet))
        .route("/pets/{id}/vaccines", get(list_vaccines).post(add_vaccine))
        .route("/vaccines/{id}", get(get_vaccine).delete(delete_vaccine))
}

async fn create_pet(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPet>,
) -> Result<(StatusCode, Json<Pet>), ApiError> {
    let pet = state.db.coordinator().create_pet(input).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

async fn list_pets(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Pet>>, ApiError> {
    Ok(Json(state.db.pets().list(checked_page(page)?).await?))
}

async fn get_pet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Pet>, ApiError> {
    state
        .db
        .pets()
        .get_active(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Pet", id))
}

async fn update_pet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PetPatch>,
) -> Result<Json<Pet>, ApiError> {
    Ok(Json(state.db.coordinator().update_pet(id, patch).await?))
}

async fn delete_pet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Pet, id).await
}

// =============================================================================
// Vaccines
// =============================================================================

async fn list_vaccines(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<Vec<Vaccine>>, ApiError> {
    if state.db.pets().get_active(pet_id).await?.is_none() {
        return Err(ApiError::not_found("Pet", pet_id));
    }

    Ok(Json(state.db.vaccines().list_for_pet(pet_id).await?))
}

async fn add_vaccine(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<i64>,
    ApiJson(input): ApiJson<NewVaccine>,
) -> Result<(StatusCode, Json<Vaccine>), ApiError> {
    let vaccine = state.db.coordinator().add_vaccine(pet_id, input).await?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

async fn get_vaccine(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vaccine>, ApiError> {
    state
        .db
        .vaccines()
        .get_by_id(id)
        .await?
        .filter(|v| v.is_active)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Vaccine", id))
}

async fn delete_vaccine(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    soft_delete(&state, EntityKind::Vaccine, id).await
}
