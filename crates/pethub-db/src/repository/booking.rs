//! # Booking Repository
//!
//! Database operations for bookings and the day schedule.
//!
//! `scheduled_time` is stored as RFC 3339 UTC text. Every value is written
//! through the same encoder, so equal instants compare equal and text order
//! matches time order.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pethub_core::{Booking, EmployeeSummary, Page, PetSummary, ScheduleEntry};

const SELECT_BOOKING: &str = r#"
    SELECT id, service_name, scheduled_time, pet_id, employee_id, delivery,
           is_active, created_at, updated_at
    FROM bookings
"#;

/// Flat join row for the schedule query.
#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i64,
    service_name: String,
    scheduled_time: DateTime<Utc>,
    delivery: bool,
    pet_id: i64,
    pet_name: String,
    pet_breed: String,
    employee_id: i64,
    employee_name: String,
    employee_job_title: String,
}

impl From<ScheduleRow> for ScheduleEntry {
    fn from(row: ScheduleRow) -> Self {
        ScheduleEntry {
            id: row.id,
            service_name: row.service_name,
            scheduled_time: row.scheduled_time,
            delivery: row.delivery,
            pet: PetSummary {
                id: row.pet_id,
                name: row.pet_name,
                breed: row.pet_breed,
            },
            employee: EmployeeSummary {
                id: row.employee_id,
                name: row.employee_name,
                job_title: row.employee_job_title,
            },
        }
    }
}

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Gets a booking by ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!("{SELECT_BOOKING} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn get_active(&self, id: i64) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING} WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Lists active bookings in schedule order.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING} WHERE is_active = 1 ORDER BY scheduled_time, id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Finds the active booking holding `employee_id` at exactly
    /// `scheduled_time`, ignoring `exclude_id`.
    pub async fn find_active_at(
        &self,
        employee_id: i64,
        scheduled_time: DateTime<Utc>,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING}
             WHERE is_active = 1
               AND employee_id = ?1
               AND scheduled_time = ?2
               AND (?3 IS NULL OR id != ?3)
             LIMIT 1"
        ))
        .bind(employee_id)
        .bind(scheduled_time)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Inserts a booking on the caller's connection.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The employee's slot was taken
    ///   by a concurrent insert (`idx_bookings_active_slot`)
    pub async fn insert(
        conn: &mut SqliteConnection,
        service_name: &str,
        scheduled_time: DateTime<Utc>,
        pet_id: i64,
        employee_id: i64,
        delivery: bool,
    ) -> DbResult<Booking> {
        debug!(employee_id, pet_id, %scheduled_time, "Inserting booking");

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (service_name, scheduled_time, pet_id, employee_id, delivery,
                                  is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            RETURNING id, service_name, scheduled_time, pet_id, employee_id, delivery,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(service_name)
        .bind(scheduled_time)
        .bind(pet_id)
        .bind(employee_id)
        .bind(delivery)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(booking)
    }

    /// Writes every editable field of an active booking.
    pub async fn update(&self, booking: &Booking) -> DbResult<Booking> {
        debug!(id = booking.id, "Updating booking");

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                service_name = ?2,
                scheduled_time = ?3,
                pet_id = ?4,
                employee_id = ?5,
                delivery = ?6,
                updated_at = ?7
            WHERE id = ?1 AND is_active = 1
            RETURNING id, service_name, scheduled_time, pet_id, employee_id, delivery,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(booking.id)
        .bind(&booking.service_name)
        .bind(booking.scheduled_time)
        .bind(booking.pet_id)
        .bind(booking.employee_id)
        .bind(booking.delivery)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Booking", booking.id))
    }

    /// Active bookings on `day` (UTC), with the pet and employee embedded.
    pub async fn list_for_day(&self, day: NaiveDate) -> DbResult<Vec<ScheduleEntry>> {
        let start = day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let end = day
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());

        let (Some(start), Some(end)) = (start, end) else {
            return Ok(Vec::new());
        };

        debug!(%day, "Loading schedule");

        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT b.id, b.service_name, b.scheduled_time, b.delivery,
                   p.id AS pet_id, p.name AS pet_name, p.breed AS pet_breed,
                   e.id AS employee_id, e.name AS employee_name,
                   e.job_title AS employee_job_title
            FROM bookings b
            INNER JOIN pets p ON p.id = b.pet_id
            INNER JOIN employees e ON e.id = b.employee_id
            WHERE b.is_active = 1
              AND b.scheduled_time >= ?1
              AND b.scheduled_time < ?2
            ORDER BY b.scheduled_time, b.id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScheduleEntry::from).collect())
    }
}
