//! # Partial Updates
//!
//! One `*Patch` struct per editable entity. Every field is optional; only the
//! fields that are `Some` are written onto the stored row.
//!
//! ```text
//! PATCH /api/customers/3   {"address": "Rua B, 20"}
//!        │
//!        ▼
//! CustomerPatch { address: Some(..), name: None, phone: None, tax_id: None }
//!        │  normalize + validate the supplied fields (pethub-db coordinator)
//!        ▼
//! patch.apply_to(&mut customer)   ← only address changes
//! ```
//!
//! Sales have no patch: they are ledger records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{deserialize_optional_scheduled_time, Booking, Customer, Employee, InventoryItem, Pet};

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// A blank address clears the stored one.
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

impl CustomerPatch {
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            customer.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            customer.address = Some(address.trim().to_string()).filter(|a| !a.is_empty());
        }
        if let Some(tax_id) = &self.tax_id {
            customer.tax_id = tax_id.clone();
        }
    }
}

// =============================================================================
// Employee
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
}

impl EmployeePatch {
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(job_title) = &self.job_title {
            employee.job_title = job_title.clone();
        }
        if let Some(phone) = &self.phone {
            employee.phone = phone.clone();
        }
        if let Some(tax_id) = &self.tax_id {
            employee.tax_id = tax_id.clone();
        }
    }
}

// =============================================================================
// Pet
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PetPatch {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub species: Option<String>,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    /// Re-assigns the pet; the new owner must be an active customer.
    pub customer_id: Option<i64>,
}

impl PetPatch {
    pub fn apply_to(&self, pet: &mut Pet) {
        if let Some(name) = &self.name {
            pet.name = name.clone();
        }
        if let Some(breed) = &self.breed {
            pet.breed = breed.clone();
        }
        if let Some(species) = &self.species {
            pet.species = species.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            pet.date_of_birth = Some(date_of_birth);
        }
        if let Some(customer_id) = self.customer_id {
            pet.customer_id = customer_id;
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct InventoryItemPatch {
    pub product_name: Option<String>,
    /// Absolute stock count (a recount), never negative.
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

impl InventoryItemPatch {
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(product_name) = &self.product_name {
            item.product_name = product_name.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit_price_cents) = self.unit_price_cents {
            item.unit_price_cents = unit_price_cents;
        }
        if let Some(low_stock_threshold) = self.low_stock_threshold {
            item.low_stock_threshold = low_stock_threshold;
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct BookingPatch {
    pub service_name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_scheduled_time")]
    #[ts(as = "Option<String>")]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub pet_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub delivery: Option<bool>,
}

impl BookingPatch {
    /// True when the patch moves the booking to another employee or time,
    /// which means the slot has to be checked again.
    pub fn moves_slot(&self) -> bool {
        self.scheduled_time.is_some() || self.employee_id.is_some()
    }

    pub fn apply_to(&self, booking: &mut Booking) {
        if let Some(service_name) = &self.service_name {
            booking.service_name = service_name.clone();
        }
        if let Some(scheduled_time) = self.scheduled_time {
            booking.scheduled_time = scheduled_time;
        }
        if let Some(pet_id) = self.pet_id {
            booking.pet_id = pet_id;
        }
        if let Some(employee_id) = self.employee_id {
            booking.employee_id = employee_id;
        }
        if let Some(delivery) = self.delivery {
            booking.delivery = delivery;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn customer() -> Customer {
        let now = Utc::now();
        Customer {
            id: 1,
            name: "Ana Souza".to_string(),
            phone: "21999990000".to_string(),
            address: Some("Rua A, 10".to_string()),
            tax_id: "52998224725".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut c = customer();
        let patch: CustomerPatch = serde_json::from_str(r#"{"name": "Ana S."}"#).unwrap();
        patch.apply_to(&mut c);

        assert_eq!(c.name, "Ana S.");
        assert_eq!(c.phone, "21999990000");
        assert_eq!(c.address.as_deref(), Some("Rua A, 10"));
        assert_eq!(c.tax_id, "52998224725");
    }

    #[test]
    fn test_blank_address_clears() {
        let mut c = customer();
        CustomerPatch {
            address: Some("  ".to_string()),
            ..Default::default()
        }
        .apply_to(&mut c);
        assert_eq!(c.address, None);
    }

    #[test]
    fn test_booking_patch() {
        let now = Utc::now();
        let mut booking = Booking {
            id: 1,
            service_name: "Banho".to_string(),
            scheduled_time: now,
            pet_id: 1,
            employee_id: 1,
            delivery: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let patch: BookingPatch =
            serde_json::from_str(r#"{"scheduled_time": "2025-03-01T14:30", "delivery": true}"#)
                .unwrap();
        assert!(patch.moves_slot());
        patch.apply_to(&mut booking);

        assert_eq!(
            booking.scheduled_time,
            Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 0).unwrap()
        );
        assert!(booking.delivery);
        assert_eq!(booking.service_name, "Banho");

        let rename: BookingPatch = serde_json::from_str(r#"{"service_name": "Tosa"}"#).unwrap();
        assert!(!rename.moves_slot());
    }
}
