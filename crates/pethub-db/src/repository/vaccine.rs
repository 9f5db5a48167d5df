//! # Vaccine Repository
//!
//! Database operations for a pet's vaccination record.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use pethub_core::{NewVaccine, Vaccine};

const SELECT_VACCINE: &str = r#"
    SELECT id, vaccine_name, date_of_application, pet_id, is_active, created_at, updated_at
    FROM vaccines
"#;

#[derive(Debug, Clone)]
pub struct VaccineRepository {
    pool: SqlitePool,
}

impl VaccineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VaccineRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Vaccine>> {
        let vaccine = sqlx::query_as::<_, Vaccine>(&format!("{SELECT_VACCINE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vaccine)
    }

    /// Active vaccines of a pet, most recent application first.
    pub async fn list_for_pet(&self, pet_id: i64) -> DbResult<Vec<Vaccine>> {
        let vaccines = sqlx::query_as::<_, Vaccine>(&format!(
            "{SELECT_VACCINE}
             WHERE pet_id = ?1 AND is_active = 1
             ORDER BY date_of_application DESC, id DESC"
        ))
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vaccines)
    }

    pub async fn insert(&self, pet_id: i64, vaccine: &NewVaccine) -> DbResult<Vaccine> {
        debug!(pet_id, vaccine_name = %vaccine.vaccine_name, "Inserting vaccine");

        let inserted = sqlx::query_as::<_, Vaccine>(
            r#"
            INSERT INTO vaccines (vaccine_name, date_of_application, pet_id, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            RETURNING id, vaccine_name, date_of_application, pet_id, is_active, created_at, updated_at
            "#,
        )
        .bind(&vaccine.vaccine_name)
        .bind(vaccine.date_of_application)
        .bind(pet_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }
}
