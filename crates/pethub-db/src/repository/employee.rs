//! # Employee Repository
//!
//! Database operations for employees. Only the CPF is unique
//! (`idx_employees_active_tax_id`); phones may repeat.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pethub_core::{Employee, NewEmployee, Page};

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, name, job_title, phone, tax_id, is_active, created_at, updated_at
    FROM employees
"#;

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Gets an employee by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn get_active(&self, id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_EMPLOYEE} WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn list(&self, page: Page) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_EMPLOYEE} WHERE is_active = 1 ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Finds an active employee with `tax_id`, ignoring `exclude_id`.
    pub async fn find_conflict(
        &self,
        tax_id: &str,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_EMPLOYEE}
             WHERE is_active = 1 AND tax_id = ?1 AND (?2 IS NULL OR id != ?2)
             LIMIT 1"
        ))
        .bind(tax_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Inserts an employee. Fields must already be normalized.
    pub async fn insert(&self, employee: &NewEmployee) -> DbResult<Employee> {
        debug!(name = %employee.name, "Inserting employee");

        let inserted = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, job_title, phone, tax_id, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            RETURNING id, name, job_title, phone, tax_id, is_active, created_at, updated_at
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.job_title)
        .bind(&employee.phone)
        .bind(&employee.tax_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Writes every editable field of an active employee.
    pub async fn update(&self, employee: &Employee) -> DbResult<Employee> {
        debug!(id = employee.id, "Updating employee");

        let updated = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name = ?2,
                job_title = ?3,
                phone = ?4,
                tax_id = ?5,
                updated_at = ?6
            WHERE id = ?1 AND is_active = 1
            RETURNING id, name, job_title, phone, tax_id, is_active, created_at, updated_at
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.job_title)
        .bind(&employee.phone)
        .bind(&employee.tax_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Employee", employee.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn test_shared_phone_allowed() {
        let db = testing::database().await;
        let first = testing::employee(&db, "Carlos").await;

        let second = db
            .employees()
            .insert(&NewEmployee {
                name: "Daniela".to_string(),
                job_title: "Tosadora".to_string(),
                phone: first.phone.clone(),
                tax_id: testing::tax_id(777_000),
            })
            .await;
        assert!(second.is_ok());

        let found = db
            .employees()
            .find_conflict(&first.tax_id, Some(first.id))
            .await
            .unwrap();
        assert!(found.is_none());

        let found = db.employees().find_conflict(&first.tax_id, None).await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(first.id));
    }
}
