//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Phone and CPF arrive here already normalized; the partial unique indexes
//! `idx_customers_active_phone` / `idx_customers_active_tax_id` back up the
//! Identity Registry's pre-insert check.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::contains_pattern;
use pethub_core::{Customer, CustomerSummary, NewCustomer, Page};

const SELECT_CUSTOMER: &str = r#"
    SELECT id, name, phone, address, tax_id, is_active, created_at, updated_at
    FROM customers
"#;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!("{SELECT_CUSTOMER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Gets a customer by ID only if it is active.
    pub async fn get_active(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists active customers in id order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} WHERE is_active = 1 ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Finds active customers whose name contains `term` (case-insensitive
    /// for ASCII letters).
    pub async fn search_by_name(&self, term: &str, limit: i64) -> DbResult<Vec<CustomerSummary>> {
        debug!(term = %term, "Searching customers");

        let customers = sqlx::query_as::<_, CustomerSummary>(
            r#"
            SELECT id, name
            FROM customers
            WHERE is_active = 1 AND name LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            LIMIT ?2
            "#,
        )
        .bind(contains_pattern(term))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Customer search returned rows");
        Ok(customers)
    }

    /// Finds an active customer that already owns `phone` or `tax_id`,
    /// ignoring `exclude_id`.
    pub async fn find_conflict(
        &self,
        phone: &str,
        tax_id: &str,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER}
             WHERE is_active = 1
               AND (phone = ?1 OR tax_id = ?2)
               AND (?3 IS NULL OR id != ?3)
             ORDER BY id
             LIMIT 1"
        ))
        .bind(phone)
        .bind(tax_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer. Fields must already be normalized.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted row
    /// * `Err(DbError::UniqueViolation)` - Phone or CPF taken by an active customer
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        debug!(name = %customer.name, "Inserting customer");

        let now = Utc::now();

        let inserted = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, address, tax_id, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            RETURNING id, name, phone, address, tax_id, is_active, created_at, updated_at
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.tax_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Writes every editable field of an active customer.
    pub async fn update(&self, customer: &Customer) -> DbResult<Customer> {
        debug!(id = customer.id, "Updating customer");

        let updated = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                address = ?4,
                tax_id = ?5,
                updated_at = ?6
            WHERE id = ?1 AND is_active = 1
            RETURNING id, name, phone, address, tax_id, is_active, created_at, updated_at
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.tax_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Customer", customer.id))
    }

    /// Counts active customers.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use pethub_core::EntityKind;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = testing::database().await;
        let repo = db.customers();

        let customer = repo
            .insert(&NewCustomer {
                name: "Ana Souza".to_string(),
                phone: "21999990000".to_string(),
                address: None,
                tax_id: "52998224725".to_string(),
            })
            .await
            .unwrap();

        assert!(customer.id > 0);
        assert!(customer.is_active);

        let fetched = repo.get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.tax_id, "52998224725");
        assert!(repo.get_by_id(customer.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_active_unique_index() {
        let db = testing::database().await;
        let first = testing::customer(&db, "Ana").await;

        let clash = db
            .customers()
            .insert(&NewCustomer {
                name: "Outra".to_string(),
                phone: first.phone.clone(),
                address: None,
                tax_id: testing::tax_id(900_000),
            })
            .await;
        assert!(matches!(clash, Err(ref e) if e.is_unique_violation_on("customers")));

        // Once the first is inactive the phone is free again
        crate::repository::soft_delete(db.pool(), EntityKind::Customer, first.id)
            .await
            .unwrap();
        let reuse = db
            .customers()
            .insert(&NewCustomer {
                name: "Outra".to_string(),
                phone: first.phone.clone(),
                address: None,
                tax_id: first.tax_id.clone(),
            })
            .await;
        assert!(reuse.is_ok());
    }

    #[tokio::test]
    async fn test_list_and_search_skip_inactive() {
        let db = testing::database().await;
        let ana = testing::customer(&db, "Ana Souza").await;
        let _bia = testing::customer(&db, "Beatriz Anacleto").await;
        let carla = testing::customer(&db, "Carla Dias").await;

        crate::repository::soft_delete(db.pool(), EntityKind::Customer, carla.id)
            .await
            .unwrap();

        let listed = db.customers().list(Page::default()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, ana.id);

        let page = db.customers().list(Page { skip: 1, limit: 1 }).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_ne!(page[0].id, ana.id);

        let found = db.customers().search_by_name("ana", 10).await.unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Souza", "Beatriz Anacleto"]);

        assert!(db.customers().search_by_name("Carla", 10).await.unwrap().is_empty());
        assert_eq!(db.customers().count_active().await.unwrap(), 2);

        // Historical lookup still works
        assert!(db.customers().get_by_id(carla.id).await.unwrap().is_some());
        assert!(db.customers().get_active(carla.id).await.unwrap().is_none());
    }
}
