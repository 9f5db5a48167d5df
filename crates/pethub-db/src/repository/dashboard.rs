//! # Dashboard Repository
//!
//! Aggregate counters. Soft-deleted rows never count.

use sqlx::SqlitePool;

use crate::error::DbResult;
use pethub_core::DashboardKpis;

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Revenue and counts over active rows, read in one statement so the
    /// numbers come from the same snapshot.
    pub async fn kpis(&self) -> DbResult<DashboardKpis> {
        let (total_revenue_cents, total_sales, total_bookings, total_customers): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COALESCE(SUM(total_value_cents), 0) FROM sales WHERE is_active = 1),
                    (SELECT COUNT(*) FROM sales WHERE is_active = 1),
                    (SELECT COUNT(*) FROM bookings WHERE is_active = 1),
                    (SELECT COUNT(*) FROM customers WHERE is_active = 1)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardKpis {
            total_revenue_cents,
            total_sales,
            total_bookings,
            total_customers,
        })
    }
}
