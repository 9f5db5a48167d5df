//! # Pet Repository
//!
//! Database operations for pets.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pethub_core::{NewPet, Page, Pet};

const SELECT_PET: &str = r#"
    SELECT id, name, breed, species, date_of_birth, customer_id, is_active, created_at, updated_at
    FROM pets
"#;

/// Repository for pet database operations.
#[derive(Debug, Clone)]
pub struct PetRepository {
    pool: SqlitePool,
}

impl PetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PetRepository { pool }
    }

    /// Gets a pet by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Pet>> {
        let pet = sqlx::query_as::<_, Pet>(&format!("{SELECT_PET} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pet)
    }

    pub async fn get_active(&self, id: i64) -> DbResult<Option<Pet>> {
        let pet = sqlx::query_as::<_, Pet>(&format!("{SELECT_PET} WHERE id = ?1 AND is_active = 1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pet)
    }

    /// Lists active pets in id order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Pet>> {
        let pets = sqlx::query_as::<_, Pet>(&format!(
            "{SELECT_PET} WHERE is_active = 1 ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(pets)
    }

    /// Inserts a pet. The owner must have been checked by the caller.
    pub async fn insert(&self, pet: &NewPet) -> DbResult<Pet> {
        debug!(name = %pet.name, customer_id = pet.customer_id, "Inserting pet");

        let inserted = sqlx::query_as::<_, Pet>(
            r#"
            INSERT INTO pets (name, breed, species, date_of_birth, customer_id, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            RETURNING id, name, breed, species, date_of_birth, customer_id, is_active, created_at, updated_at
            "#,
        )
        .bind(&pet.name)
        .bind(&pet.breed)
        .bind(&pet.species)
        .bind(pet.date_of_birth)
        .bind(pet.customer_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Writes every editable field of an active pet.
    pub async fn update(&self, pet: &Pet) -> DbResult<Pet> {
        debug!(id = pet.id, "Updating pet");

        let updated = sqlx::query_as::<_, Pet>(
            r#"
            UPDATE pets SET
                name = ?2,
                breed = ?3,
                species = ?4,
                date_of_birth = ?5,
                customer_id = ?6,
                updated_at = ?7
            WHERE id = ?1 AND is_active = 1
            RETURNING id, name, breed, species, date_of_birth, customer_id, is_active, created_at, updated_at
            "#,
        )
        .bind(pet.id)
        .bind(&pet.name)
        .bind(&pet.breed)
        .bind(&pet.species)
        .bind(pet.date_of_birth)
        .bind(pet.customer_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Pet", pet.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_insert_keeps_birth_date() {
        let db = testing::database().await;
        let owner = testing::customer(&db, "Ana").await;

        let pet = db
            .pets()
            .insert(&NewPet {
                name: "Rex".to_string(),
                breed: "Labrador".to_string(),
                species: "Cachorro".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2020, 5, 17),
                customer_id: owner.id,
            })
            .await
            .unwrap();

        let fetched = db.pets().get_by_id(pet.id).await.unwrap().unwrap();
        assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(2020, 5, 17));
        assert_eq!(fetched.customer_id, owner.id);
    }

    #[tokio::test]
    async fn test_unknown_owner_violates_foreign_key() {
        let db = testing::database().await;

        let result = db
            .pets()
            .insert(&NewPet {
                name: "Rex".to_string(),
                breed: "SRD".to_string(),
                species: "Cachorro".to_string(),
                date_of_birth: None,
                customer_id: 4242,
            })
            .await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }
}
