//! # Domain Types
//!
//! Core domain types used throughout Pet Control Hub.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │──►│      Pet        │──►│    Vaccine      │       │
//! │  │  phone (uniq)   │   │  customer_id    │   │  pet_id         │       │
//! │  │  tax_id (uniq)  │   │  breed, species │   │  applied on     │       │
//! │  └────────┬────────┘   └────────┬────────┘   └─────────────────┘       │
//! │           │                     │                                       │
//! │           ▼                     ▼                                       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    Booking      │◄──│    Employee     │       │
//! │  │  product_id ────┼─┐ │  scheduled_time │   │  tax_id (uniq)  │       │
//! │  │  quantity       │ │ │  delivery       │   │  job_title      │       │
//! │  └─────────────────┘ │ └─────────────────┘   └─────────────────┘       │
//! │                      ▼                                                  │
//! │             ┌─────────────────┐                                         │
//! │             │ InventoryItem   │  quantity >= 0, low-stock threshold     │
//! │             └─────────────────┘                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Lifecycle
//! Every entity has a server-assigned integer `id`, `created_at`,
//! `updated_at` and `is_active`. Deleting only flips `is_active` to false;
//! inactive rows are never reactivated.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_PAGE_LIMIT, DEFAULT_LOW_STOCK_THRESHOLD};

// =============================================================================
// Customer
// =============================================================================

/// A customer of the shop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Digits only, unique among active customers.
    pub phone: String,
    pub address: Option<String>,
    /// CPF, digits only, unique among active customers.
    pub tax_id: String,
    /// Whether the customer is active (soft delete).
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a customer. Phone and CPF may be formatted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub tax_id: String,
}

/// `{id, name}` pair returned by the customer search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Pet
// =============================================================================

/// A pet owned by a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub species: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub customer_id: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub species: String,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub customer_id: i64,
}

// =============================================================================
// Employee
// =============================================================================

/// A member of staff who performs booked services.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub job_title: String,
    /// Digits only. Not unique: two employees may share a landline.
    pub phone: String,
    /// CPF, digits only, unique among active employees.
    pub tax_id: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewEmployee {
    pub name: String,
    pub job_title: String,
    pub phone: String,
    pub tax_id: String,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    pub id: i64,
    /// Unique among active items.
    pub product_name: String,
    /// Units on hand, never negative.
    pub quantity: i64,
    /// Price per unit in centavos.
    pub unit_price_cents: i64,
    /// Item is "low stock" when `quantity <= low_stock_threshold`.
    pub low_stock_threshold: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

impl NewInventoryItem {
    /// Threshold to store, falling back to the shop default.
    pub fn threshold(&self) -> i64 {
        self.low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

/// How a sale names the product it debits.
///
/// The id is the canonical key; the name is accepted for clients that only
/// know what is printed on the shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductRef::Id(id) => write!(f, "#{}", id),
            ProductRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Filters for the inventory listing.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Only items at or below their low-stock threshold.
    pub low_stock_only: bool,
    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Sales are never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    /// The inventory item that was debited.
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub total_value_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

/// Input for recording a sale.
///
/// Exactly one of `product_id` / `product_name` identifies the product.
/// When `total_value_cents` is omitted the total is `unit price × quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub total_value_cents: Option<i64>,
    pub customer_id: i64,
}

impl NewSale {
    /// Resolves which product the sale refers to. The id wins when both
    /// are present.
    pub fn product_ref(&self) -> Result<ProductRef, ValidationError> {
        if let Some(id) = self.product_id {
            return Ok(ProductRef::Id(id));
        }

        match self.product_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(ProductRef::Name(name.to_string())),
            _ => Err(ValidationError::Required {
                field: "product_id".to_string(),
            }),
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A scheduled service for a pet, performed by an employee.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: i64,
    pub service_name: String,
    #[ts(as = "String")]
    pub scheduled_time: DateTime<Utc>,
    pub pet_id: i64,
    pub employee_id: i64,
    /// Whether the pet is picked up and delivered.
    pub delivery: bool,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBooking {
    pub service_name: String,
    #[serde(deserialize_with = "deserialize_scheduled_time")]
    #[ts(as = "String")]
    pub scheduled_time: DateTime<Utc>,
    pub pet_id: i64,
    pub employee_id: i64,
    #[serde(default)]
    pub delivery: bool,
}

// =============================================================================
// Vaccine
// =============================================================================

/// A vaccine applied to a pet.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vaccine {
    pub id: i64,
    pub vaccine_name: String,
    #[ts(as = "String")]
    pub date_of_application: NaiveDate,
    pub pet_id: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a vaccine; the pet comes from the request path.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVaccine {
    pub vaccine_name: String,
    #[ts(as = "String")]
    pub date_of_application: NaiveDate,
}

// =============================================================================
// Read Models
// =============================================================================

/// Aggregate counters for the dashboard. Only active rows are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardKpis {
    pub total_revenue_cents: i64,
    pub total_sales: i64,
    pub total_bookings: i64,
    pub total_customers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PetSummary {
    pub id: i64,
    pub name: String,
    pub breed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeSummary {
    pub id: i64,
    pub name: String,
    pub job_title: String,
}

/// One line of the day's schedule, with the pet and employee embedded.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScheduleEntry {
    pub id: i64,
    pub service_name: String,
    #[ts(as = "String")]
    pub scheduled_time: DateTime<Utc>,
    pub delivery: bool,
    pub pet: PetSummary,
    pub employee: EmployeeSummary,
}

// =============================================================================
// Pagination
// =============================================================================

/// `skip` / `limit` window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

// =============================================================================
// Entity Kind
// =============================================================================

/// Every soft-deletable entity, mapped to its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Pet,
    Employee,
    InventoryItem,
    Sale,
    Booking,
    Vaccine,
}

impl EntityKind {
    /// Table name. Static strings only, so it is safe to splice into SQL.
    pub const fn table(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::Pet => "pets",
            EntityKind::Employee => "employees",
            EntityKind::InventoryItem => "inventory",
            EntityKind::Sale => "sales",
            EntityKind::Booking => "bookings",
            EntityKind::Vaccine => "vaccines",
        }
    }

    /// Human-readable name used in error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            EntityKind::Customer => "Customer",
            EntityKind::Pet => "Pet",
            EntityKind::Employee => "Employee",
            EntityKind::InventoryItem => "Inventory item",
            EntityKind::Sale => "Sale",
            EntityKind::Booking => "Booking",
            EntityKind::Vaccine => "Vaccine",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Scheduled Time Parsing
// =============================================================================

/// Parses a booking time.
///
/// Accepts RFC 3339 (`2025-03-01T10:00:00Z`, `2025-03-01T07:00:00-03:00`)
/// or a naive `2025-03-01T10:00[:SS]` form, which is taken as UTC.
///
/// ## Example
/// ```rust
/// use pethub_core::types::parse_scheduled_time;
///
/// let a = parse_scheduled_time("2025-03-01T10:00:00Z").unwrap();
/// let b = parse_scheduled_time("2025-03-01T10:00").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_scheduled_time("tomorrow").is_none());
/// ```
pub fn parse_scheduled_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// serde adapter for [`parse_scheduled_time`].
pub fn deserialize_scheduled_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_scheduled_time(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid scheduled_time '{}'", raw))
    })
}

/// serde adapter for an optional booking time (used by patches).
pub fn deserialize_optional_scheduled_time<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_scheduled_time(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid scheduled_time '{}'", raw))
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
