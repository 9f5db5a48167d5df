//! # Scheduling Guard
//!
//! An employee can hold at most one active booking per exact instant.
//! The guard answers that question before a booking is written; the
//! `idx_bookings_active_slot` index settles it when two writers race.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::{DbError, DbResult};
use crate::repository::BookingRepository;
use pethub_core::CoreError;

#[derive(Debug, Clone)]
pub struct SchedulingGuard {
    pool: SqlitePool,
}

impl SchedulingGuard {
    pub fn new(pool: SqlitePool) -> Self {
        SchedulingGuard { pool }
    }

    /// Fails with `SlotConflict` when `employee_id` already has an active
    /// booking at `scheduled_time`. `exclude_booking_id` lets a booking
    /// being edited keep its own slot.
    pub async fn check_available(
        &self,
        employee_id: i64,
        scheduled_time: DateTime<Utc>,
        exclude_booking_id: Option<i64>,
    ) -> DbResult<()> {
        let taken = BookingRepository::new(self.pool.clone())
            .find_active_at(employee_id, scheduled_time, exclude_booking_id)
            .await?;

        match taken {
            None => Ok(()),
            Some(existing) => {
                warn!(employee_id, booking_id = existing.id, %scheduled_time, "Slot already taken");
                Err(slot_conflict(employee_id, scheduled_time))
            }
        }
    }
}

pub(crate) fn slot_conflict(employee_id: i64, scheduled_time: DateTime<Utc>) -> DbError {
    DbError::Core(CoreError::SlotConflict {
        employee_id,
        scheduled_time: scheduled_time.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::TimeZone;
    use pethub_core::NewBooking;

    #[tokio::test]
    async fn test_slot_checks() {
        let db = testing::database().await;
        let owner = testing::customer(&db, "Ana").await;
        let rex = testing::pet(&db, owner.id, "Rex").await;
        let carlos = testing::employee(&db, "Carlos").await;
        let daniela = testing::employee(&db, "Daniela").await;
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();

        let booking = db
            .coordinator()
            .create_booking(NewBooking {
                service_name: "Banho".to_string(),
                scheduled_time: at,
                pet_id: rex.id,
                employee_id: carlos.id,
                delivery: false,
            })
            .await
            .unwrap();

        let guard = db.scheduling();
        let taken = guard.check_available(carlos.id, at, None).await;
        match taken {
            Err(DbError::Core(CoreError::SlotConflict { employee_id, scheduled_time })) => {
                assert_eq!(employee_id, carlos.id);
                assert_eq!(scheduled_time, at.to_rfc3339());
            }
            other => panic!("expected SlotConflict, got {:?}", other),
        }

        // Own slot, other employee, other minute
        assert!(guard.check_available(carlos.id, at, Some(booking.id)).await.is_ok());
        assert!(guard.check_available(daniela.id, at, None).await.is_ok());
        let later = Utc.with_ymd_and_hms(2026, 3, 10, 14, 1, 0).unwrap();
        assert!(guard.check_available(carlos.id, later, None).await.is_ok());
    }
}
