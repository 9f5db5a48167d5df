//! # Inventory Ledger
//!
//! Owns stock levels. Creation and edits go through here; the only way a
//! sale changes a quantity is [`InventoryLedger::debit`], which runs inside
//! the sale transaction.
//!
//! ## Debit Outcomes
//! ```text
//! debit(#7, 3)
//!    │
//!    ├── conditional UPDATE touched a row    → Ok(item), quantity lowered
//!    │
//!    └── no row touched, look the item up:
//!          ├── missing or inactive           → ProductNotFound
//!          └── active, quantity < 3          → InsufficientStock
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::InventoryRepository;
use pethub_core::validation::{validate_name, validate_non_negative, validate_page, validate_price_cents};
use pethub_core::{CoreError, InventoryFilter, InventoryItem, NewInventoryItem, Page, ProductRef};

#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    fn repo(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    /// Creates an item after validating counts and price.
    ///
    /// ## Errors
    /// * `Validation` - blank name, negative quantity, price or threshold
    /// * `DuplicateProduct` - an active item already has this name
    pub async fn create_item(&self, input: NewInventoryItem) -> DbResult<InventoryItem> {
        let candidate = NewInventoryItem {
            product_name: validate_name("product_name", &input.product_name)?,
            ..input
        };
        validate_non_negative("quantity", candidate.quantity)?;
        validate_price_cents("unit_price_cents", candidate.unit_price_cents)?;
        validate_non_negative("low_stock_threshold", candidate.threshold())?;

        self.ensure_name_unique(&candidate.product_name, None).await?;

        match self.repo().insert(&candidate).await {
            Ok(item) => {
                info!(id = item.id, product = %item.product_name, quantity = item.quantity, "Inventory item created");
                Ok(item)
            }
            Err(err) if err.is_unique_violation_on("inventory") => {
                self.ensure_name_unique(&candidate.product_name, None).await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Fails with `DuplicateProduct` if another active item is named
    /// `product_name`.
    pub async fn ensure_name_unique(&self, product_name: &str, exclude_id: Option<i64>) -> DbResult<()> {
        match self.repo().find_name_conflict(product_name, exclude_id).await? {
            None => Ok(()),
            Some(existing) => Err(DbError::Core(CoreError::DuplicateProduct {
                id: existing.id,
                product_name: existing.product_name,
            })),
        }
    }

    /// Gets an active item by id.
    pub async fn get(&self, id: i64) -> DbResult<InventoryItem> {
        self.repo()
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    pub async fn list(&self, filter: &InventoryFilter, page: Page) -> DbResult<Vec<InventoryItem>> {
        validate_page(&page)?;
        self.repo().list(filter, page).await
    }

    /// Takes `quantity` units out of stock on the caller's connection.
    ///
    /// Must run inside the caller's transaction so that a failure later in
    /// the same unit of work puts the units back.
    pub async fn debit(
        conn: &mut SqliteConnection,
        product: &ProductRef,
        quantity: i64,
    ) -> DbResult<InventoryItem> {
        if let Some(item) = InventoryRepository::debit(&mut *conn, product, quantity).await? {
            if item.is_low_stock() {
                warn!(id = item.id, product = %item.product_name, quantity = item.quantity, "Stock is low");
            }
            return Ok(item);
        }

        match InventoryRepository::find_active_by_ref(&mut *conn, product).await? {
            None => {
                warn!(product = %product, "Sale rejected: product not found");
                Err(CoreError::ProductNotFound(product.to_string()).into())
            }
            Some(item) => {
                warn!(
                    product = %item.product_name,
                    available = item.quantity,
                    requested = quantity,
                    "Sale rejected: insufficient stock"
                );
                Err(CoreError::InsufficientStock {
                    product: item.product_name,
                    available: item.quantity,
                    requested: quantity,
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use pethub_core::ValidationError;

    fn item(name: &str, quantity: i64) -> NewInventoryItem {
        NewInventoryItem {
            product_name: name.to_string(),
            quantity,
            unit_price_cents: 4990,
            low_stock_threshold: None,
        }
    }

    #[tokio::test]
    async fn test_create_item_defaults_threshold() {
        let db = testing::database().await;

        let created = db.ledger().create_item(item("  Areia Sanitária ", 12)).await.unwrap();

        assert_eq!(created.product_name, "Areia Sanitária");
        assert_eq!(created.low_stock_threshold, pethub_core::DEFAULT_LOW_STOCK_THRESHOLD);
        assert!(!created.is_low_stock());
        assert_eq!(db.ledger().get(created.id).await.unwrap().quantity, 12);
    }

    #[tokio::test]
    async fn test_create_item_rejects_bad_input() {
        let db = testing::database().await;

        let negative = db.ledger().create_item(item("Osso", -1)).await;
        assert!(matches!(
            negative,
            Err(DbError::Core(CoreError::Validation(ValidationError::MustNotBeNegative { .. })))
        ));

        let free = NewInventoryItem {
            unit_price_cents: 0,
            ..item("Brinde", 1)
        };
        assert!(db.ledger().create_item(free).await.is_ok());

        db.ledger().create_item(item("Osso", 3)).await.unwrap();
        let duplicate = db.ledger().create_item(item("Osso", 5)).await;
        assert!(matches!(
            duplicate,
            Err(DbError::Core(CoreError::DuplicateProduct { .. }))
        ));
    }

    #[tokio::test]
    async fn test_debit_distinguishes_missing_from_short() {
        let db = testing::database().await;
        let stocked = testing::item(&db, "Shampoo", 2, 1500).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let short = InventoryLedger::debit(&mut conn, &ProductRef::Id(stocked.id), 3).await;
        match short {
            Err(DbError::Core(CoreError::InsufficientStock { available, requested, .. })) => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        let missing = InventoryLedger::debit(&mut conn, &ProductRef::Name("Nada".to_string()), 1).await;
        assert!(matches!(missing, Err(DbError::Core(CoreError::ProductNotFound(_)))));

        let ok = InventoryLedger::debit(&mut conn, &ProductRef::Id(stocked.id), 2)
            .await
            .unwrap();
        assert_eq!(ok.quantity, 0);
    }

    #[tokio::test]
    async fn test_list_validates_page() {
        let db = testing::database().await;
        let result = db
            .ledger()
            .list(&InventoryFilter::default(), Page { skip: 0, limit: 0 })
            .await;
        assert!(matches!(result, Err(DbError::Core(CoreError::Validation(_)))));

        assert!(matches!(
            db.ledger().get(42).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
