//! # Inventory Repository
//!
//! Database operations for inventory items.
//!
//! ## Conditional Debit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check, write                                          │
//! │     SELECT quantity ...            (two sales both read 1)             │
//! │     UPDATE ... SET quantity = 0    (both write, one unit sold twice)   │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional statement                                  │
//! │     UPDATE inventory SET quantity = quantity - ?n                      │
//! │     WHERE id = ? AND is_active = 1 AND quantity >= ?n                  │
//! │                                                                         │
//! │  SQLite serializes writers, so the check and the write cannot be       │
//! │  interleaved. Zero rows touched means "not found" or "not enough".    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::contains_pattern;
use pethub_core::{InventoryFilter, InventoryItem, NewInventoryItem, Page, ProductRef};

const SELECT_ITEM: &str = r#"
    SELECT id, product_name, quantity, unit_price_cents, low_stock_threshold,
           is_active, created_at, updated_at
    FROM inventory
"#;

const RETURNING_ITEM: &str = r#"
    RETURNING id, product_name, quantity, unit_price_cents, low_stock_threshold,
              is_active, created_at, updated_at
"#;

/// SQL predicate selecting a product by id or by name.
fn ref_predicate(product: &ProductRef, param: usize) -> String {
    match product {
        ProductRef::Id(_) => format!("id = ?{param}"),
        ProductRef::Name(_) => format!("product_name = ?{param}"),
    }
}

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets an item by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_ITEM} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn get_active(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "{SELECT_ITEM} WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Finds an active item named exactly `product_name`, ignoring `exclude_id`.
    pub async fn find_name_conflict(
        &self,
        product_name: &str,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "{SELECT_ITEM}
             WHERE is_active = 1 AND product_name = ?1 AND (?2 IS NULL OR id != ?2)
             LIMIT 1"
        ))
        .bind(product_name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists active items ordered by product name.
    ///
    /// ## Filters
    /// - `low_stock_only`: `quantity <= low_stock_threshold`
    /// - `name_contains`: substring match, ASCII case-insensitive
    pub async fn list(&self, filter: &InventoryFilter, page: Page) -> DbResult<Vec<InventoryItem>> {
        debug!(
            low_stock_only = filter.low_stock_only,
            name = ?filter.name_contains,
            "Listing inventory"
        );

        let pattern = filter
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"{SELECT_ITEM}
               WHERE is_active = 1
                 AND (?1 = 0 OR quantity <= low_stock_threshold)
                 AND (?2 IS NULL OR product_name LIKE ?2 ESCAPE '\')
               ORDER BY product_name, id
               LIMIT ?3 OFFSET ?4"#
        ))
        .bind(filter.low_stock_only)
        .bind(pattern)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts an item. Fields must already be validated.
    pub async fn insert(&self, item: &NewInventoryItem) -> DbResult<InventoryItem> {
        debug!(product_name = %item.product_name, "Inserting inventory item");

        let inserted = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory (product_name, quantity, unit_price_cents, low_stock_threshold,
                                   is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            {RETURNING_ITEM}
            "#
        ))
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.threshold())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Writes every editable field of an active item.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<InventoryItem> {
        debug!(id = item.id, "Updating inventory item");

        let updated = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory SET
                product_name = ?2,
                quantity = ?3,
                unit_price_cents = ?4,
                low_stock_threshold = ?5,
                updated_at = ?6
            WHERE id = ?1 AND is_active = 1
            {RETURNING_ITEM}
            "#
        ))
        .bind(item.id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.low_stock_threshold)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Inventory item", item.id))
    }

    /// Subtracts `quantity` units if, and only if, the item is active and
    /// has at least that many. Runs on the caller's connection so it joins
    /// the caller's transaction.
    ///
    /// ## Returns
    /// * `Ok(Some(item))` - Debited; `item.quantity` is the new level
    /// * `Ok(None)` - No row matched (missing, inactive, or short on stock)
    pub async fn debit(
        conn: &mut SqliteConnection,
        product: &ProductRef,
        quantity: i64,
    ) -> DbResult<Option<InventoryItem>> {
        debug!(product = %product, quantity, "Debiting stock");

        let sql = format!(
            r#"
            UPDATE inventory
            SET quantity = quantity - ?1, updated_at = ?2
            WHERE {} AND is_active = 1 AND quantity >= ?1
            {RETURNING_ITEM}
            "#,
            ref_predicate(product, 3)
        );

        let query = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(quantity)
            .bind(Utc::now());

        let query = match product {
            ProductRef::Id(id) => query.bind(*id),
            ProductRef::Name(name) => query.bind(name.as_str()),
        };

        Ok(query.fetch_optional(&mut *conn).await?)
    }

    /// Looks up an active item by id or name on the caller's connection.
    pub async fn find_active_by_ref(
        conn: &mut SqliteConnection,
        product: &ProductRef,
    ) -> DbResult<Option<InventoryItem>> {
        let sql = format!(
            "{SELECT_ITEM} WHERE {} AND is_active = 1 LIMIT 1",
            ref_predicate(product, 1)
        );

        let query = sqlx::query_as::<_, InventoryItem>(&sql);
        let query = match product {
            ProductRef::Id(id) => query.bind(*id),
            ProductRef::Name(name) => query.bind(name.as_str()),
        };

        Ok(query.fetch_optional(&mut *conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn test_debit_is_conditional() {
        let db = testing::database().await;
        let item = testing::item(&db, "Shampoo Neutro", 3, 2550).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let after = InventoryRepository::debit(&mut conn, &ProductRef::Id(item.id), 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.quantity, 1);

        let short = InventoryRepository::debit(&mut conn, &ProductRef::Id(item.id), 2)
            .await
            .unwrap();
        assert!(short.is_none());

        let by_name = InventoryRepository::debit(
            &mut conn,
            &ProductRef::Name("Shampoo Neutro".to_string()),
            1,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(by_name.quantity, 0);

        let missing = InventoryRepository::find_active_by_ref(&mut conn, &ProductRef::Id(999))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = testing::database().await;
        testing::item(&db, "Ração Premium", 50, 18990).await;
        testing::item(&db, "Ração Filhote", 2, 9990).await;
        testing::item(&db, "Coleira", 5, 2500).await;

        let all = db
            .inventory()
            .list(&InventoryFilter::default(), Page::default())
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Coleira", "Ração Filhote", "Ração Premium"]);

        let low = db
            .inventory()
            .list(
                &InventoryFilter {
                    low_stock_only: true,
                    name_contains: None,
                },
                Page::default(),
            )
            .await
            .unwrap();
        let names: Vec<_> = low.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Coleira", "Ração Filhote"]);

        let named = db
            .inventory()
            .list(
                &InventoryFilter {
                    low_stock_only: false,
                    name_contains: Some("ração".to_string()),
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(named.len(), 2);
    }

    #[tokio::test]
    async fn test_quantity_check_constraint() {
        let db = testing::database().await;
        let mut item = testing::item(&db, "Petisco", 1, 500).await;

        item.quantity = -1;
        let result = db.inventory().update(&item).await;
        assert!(matches!(result, Err(DbError::QueryFailed(_))));
    }
}
