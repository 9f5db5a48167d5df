//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (TransactionCoordinator::create_sale)                       │
//! │     ├── InventoryLedger::debit        (same transaction)               │
//! │     └── SaleRepository::insert        (same transaction)               │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── get_by_id / list                                               │
//! │                                                                         │
//! │  3. (OPTIONAL) SOFT DELETE                                             │
//! │     └── is_active = 0; stock is NOT returned                           │
//! │                                                                         │
//! │  There is no update: a sale is a ledger record.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use pethub_core::{Page, Sale};

const SELECT_SALE: &str = r#"
    SELECT id, product_id, customer_id, quantity, total_value_cents, is_active, created_at, updated_at
    FROM sales
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists active sales, newest first.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{SELECT_SALE} WHERE is_active = 1 ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Inserts a sale on the caller's connection (inside the sale transaction).
    pub async fn insert(
        conn: &mut SqliteConnection,
        product_id: i64,
        customer_id: i64,
        quantity: i64,
        total_value_cents: i64,
    ) -> DbResult<Sale> {
        debug!(product_id, customer_id, quantity, "Inserting sale");

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (product_id, customer_id, quantity, total_value_cents,
                               is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            RETURNING id, product_id, customer_id, quantity, total_value_cents,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(customer_id)
        .bind(quantity)
        .bind(total_value_cents)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(sale)
    }
}
