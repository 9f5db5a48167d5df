//! # Transaction Coordinator
//!
//! Every write that touches more than one row, or that must re-check a
//! business rule, goes through here.
//!
//! ## Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(NewSale)                                                   │
//! │                                                                         │
//! │  1. validate quantity > 0, total >= 0, product reference               │
//! │  2. customer active?                          no → NotFound            │
//! │  3. BEGIN                                                               │
//! │  4.   InventoryLedger::debit   (conditional UPDATE, takes write lock)  │
//! │         └── ProductNotFound / InsufficientStock → drop tx (ROLLBACK)   │
//! │  5.   INSERT INTO sales (product_id = debited item id)                 │
//! │         └── error → drop tx (ROLLBACK), stock restored                 │
//! │  6. COMMIT                                    fails → TransactionFailed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Booking Transaction
//! ```text
//! validate service → pet active → employee active → SchedulingGuard
//!     → BEGIN → INSERT (unique slot index) → COMMIT
//!                   └── UNIQUE fired → SlotConflict
//! ```
//!
//! Validation reads use the pool and finish before `BEGIN`; nothing
//! borrows a second connection while a transaction is open.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{
    self, BookingRepository, CustomerRepository, EmployeeRepository, InventoryRepository,
    PetRepository, SaleRepository, VaccineRepository,
};
use crate::service::identity::IdentityRegistry;
use crate::service::ledger::InventoryLedger;
use crate::service::scheduling::{slot_conflict, SchedulingGuard};
use crate::service::transaction_failed;
use pethub_core::normalize::{parse_phone, parse_tax_id};
use pethub_core::validation::{
    validate_name, validate_non_negative, validate_optional_text, validate_price_cents,
    validate_quantity,
};
use pethub_core::{
    Booking, BookingPatch, Customer, CustomerPatch, Employee, EmployeePatch, EntityKind,
    InventoryItem, InventoryItemPatch, NewBooking, NewPet, NewSale, NewVaccine, Pet, PetPatch,
    Sale, ValidationError, Vaccine,
};

/// Runs the multi-step writes as single units of work.
#[derive(Debug, Clone)]
pub struct TransactionCoordinator {
    pool: SqlitePool,
}

impl TransactionCoordinator {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionCoordinator { pool }
    }

    fn identity(&self) -> IdentityRegistry {
        IdentityRegistry::new(self.pool.clone())
    }

    fn scheduling(&self) -> SchedulingGuard {
        SchedulingGuard::new(self.pool.clone())
    }

    fn ledger(&self) -> InventoryLedger {
        InventoryLedger::new(self.pool.clone())
    }

    async fn active_customer(&self, id: i64) -> DbResult<Customer> {
        CustomerRepository::new(self.pool.clone())
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    async fn active_pet(&self, id: i64) -> DbResult<Pet> {
        PetRepository::new(self.pool.clone())
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Pet", id))
    }

    async fn active_employee(&self, id: i64) -> DbResult<Employee> {
        EmployeeRepository::new(self.pool.clone())
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Employee", id))
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and debits stock atomically.
    ///
    /// ## Errors
    /// * `Validation` - quantity <= 0, negative total, no product reference
    /// * `NotFound` - customer missing or inactive
    /// * `ProductNotFound` / `InsufficientStock` - from the ledger
    /// * `TransactionFailed` - BEGIN or COMMIT failed
    pub async fn create_sale(&self, input: NewSale) -> DbResult<Sale> {
        validate_quantity(input.quantity)?;
        if let Some(total) = input.total_value_cents {
            validate_price_cents("total_value_cents", total)?;
        }
        let product = input.product_ref()?;

        self.active_customer(input.customer_id).await?;

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let item = InventoryLedger::debit(&mut *tx, &product, input.quantity).await?;

        let total_value_cents = match input.total_value_cents {
            Some(total) => total,
            None => item
                .unit_price()
                .checked_mul_quantity(input.quantity)
                .ok_or(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: i64::MAX / item.unit_price_cents.max(1),
                })?
                .cents(),
        };

        let sale = SaleRepository::insert(
            &mut *tx,
            item.id,
            input.customer_id,
            input.quantity,
            total_value_cents,
        )
        .await?;

        tx.commit().await.map_err(transaction_failed)?;

        info!(
            sale_id = sale.id,
            product = %item.product_name,
            quantity = sale.quantity,
            total = %sale.total_value(),
            remaining = item.quantity,
            "Sale recorded"
        );

        Ok(sale)
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Books a service for a pet with an employee.
    ///
    /// ## Errors
    /// * `Validation` - blank service name
    /// * `NotFound` - pet or employee missing or inactive
    /// * `SlotConflict` - the employee is already booked at that instant
    pub async fn create_booking(&self, input: NewBooking) -> DbResult<Booking> {
        let service_name = validate_name("service_name", &input.service_name)?;

        self.active_pet(input.pet_id).await?;
        self.active_employee(input.employee_id).await?;
        self.scheduling()
            .check_available(input.employee_id, input.scheduled_time, None)
            .await?;

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let booking = BookingRepository::insert(
            &mut *tx,
            &service_name,
            input.scheduled_time,
            input.pet_id,
            input.employee_id,
            input.delivery,
        )
        .await
        .map_err(|err| {
            if err.is_unique_violation_on("bookings") {
                slot_conflict(input.employee_id, input.scheduled_time)
            } else {
                err
            }
        })?;

        tx.commit().await.map_err(transaction_failed)?;

        info!(
            booking_id = booking.id,
            employee_id = booking.employee_id,
            scheduled_time = %booking.scheduled_time,
            "Booking created"
        );

        Ok(booking)
    }

    /// Applies a booking patch. Moving the booking re-checks the slot.
    pub async fn update_booking(&self, id: i64, mut patch: BookingPatch) -> DbResult<Booking> {
        let mut booking = BookingRepository::new(self.pool.clone())
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))?;

        if let Some(service_name) = &patch.service_name {
            patch.service_name = Some(validate_name("service_name", service_name)?);
        }
        if let Some(pet_id) = patch.pet_id {
            self.active_pet(pet_id).await?;
        }
        if let Some(employee_id) = patch.employee_id {
            self.active_employee(employee_id).await?;
        }

        let moves_slot = patch.moves_slot();
        patch.apply_to(&mut booking);

        if moves_slot {
            self.scheduling()
                .check_available(booking.employee_id, booking.scheduled_time, Some(id))
                .await?;
        }

        let updated = BookingRepository::new(self.pool.clone())
            .update(&booking)
            .await
            .map_err(|err| {
                if err.is_unique_violation_on("bookings") {
                    slot_conflict(booking.employee_id, booking.scheduled_time)
                } else {
                    err
                }
            })?;

        info!(booking_id = id, "Booking updated");
        Ok(updated)
    }

    // =========================================================================
    // People and Pets
    // =========================================================================

    /// Re-normalizes changed identity fields and re-checks uniqueness,
    /// ignoring the customer itself.
    pub async fn update_customer(&self, id: i64, mut patch: CustomerPatch) -> DbResult<Customer> {
        let mut customer = self.active_customer(id).await?;

        if let Some(name) = &patch.name {
            patch.name = Some(validate_name("name", name)?);
        }
        if let Some(phone) = &patch.phone {
            patch.phone = Some(parse_phone(phone)?);
        }
        if let Some(tax_id) = &patch.tax_id {
            patch.tax_id = Some(parse_tax_id(tax_id)?);
        }
        if let Some(address) = &patch.address {
            validate_optional_text("address", Some(address.as_str()))?;
        }

        let identity_changed = patch.phone.is_some() || patch.tax_id.is_some();
        patch.apply_to(&mut customer);

        if identity_changed {
            self.identity()
                .ensure_customer_unique(&customer.phone, &customer.tax_id, Some(id))
                .await?;
        }

        match CustomerRepository::new(self.pool.clone()).update(&customer).await {
            Ok(updated) => {
                info!(customer_id = id, "Customer updated");
                Ok(updated)
            }
            Err(err) if err.is_unique_violation_on("customers") => {
                self.identity()
                    .ensure_customer_unique(&customer.phone, &customer.tax_id, Some(id))
                    .await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn update_employee(&self, id: i64, mut patch: EmployeePatch) -> DbResult<Employee> {
        let mut employee = self.active_employee(id).await?;

        if let Some(name) = &patch.name {
            patch.name = Some(validate_name("name", name)?);
        }
        if let Some(job_title) = &patch.job_title {
            patch.job_title = Some(validate_name("job_title", job_title)?);
        }
        if let Some(phone) = &patch.phone {
            patch.phone = Some(parse_phone(phone)?);
        }
        if let Some(tax_id) = &patch.tax_id {
            patch.tax_id = Some(parse_tax_id(tax_id)?);
        }

        let tax_id_changed = patch.tax_id.is_some();
        patch.apply_to(&mut employee);

        if tax_id_changed {
            self.identity()
                .ensure_employee_unique(&employee.tax_id, Some(id))
                .await?;
        }

        match EmployeeRepository::new(self.pool.clone()).update(&employee).await {
            Ok(updated) => {
                info!(employee_id = id, "Employee updated");
                Ok(updated)
            }
            Err(err) if err.is_unique_violation_on("employees") => {
                self.identity()
                    .ensure_employee_unique(&employee.tax_id, Some(id))
                    .await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Registers a pet for an active customer.
    pub async fn create_pet(&self, input: NewPet) -> DbResult<Pet> {
        let candidate = NewPet {
            name: validate_name("name", &input.name)?,
            breed: validate_name("breed", &input.breed)?,
            species: validate_name("species", &input.species)?,
            ..input
        };

        self.active_customer(candidate.customer_id).await?;

        let pet = PetRepository::new(self.pool.clone()).insert(&candidate).await?;
        info!(pet_id = pet.id, customer_id = pet.customer_id, "Pet registered");
        Ok(pet)
    }

    pub async fn update_pet(&self, id: i64, mut patch: PetPatch) -> DbResult<Pet> {
        let mut pet = self.active_pet(id).await?;

        if let Some(name) = &patch.name {
            patch.name = Some(validate_name("name", name)?);
        }
        if let Some(breed) = &patch.breed {
            patch.breed = Some(validate_name("breed", breed)?);
        }
        if let Some(species) = &patch.species {
            patch.species = Some(validate_name("species", species)?);
        }
        if let Some(customer_id) = patch.customer_id {
            self.active_customer(customer_id).await?;
        }

        patch.apply_to(&mut pet);

        let updated = PetRepository::new(self.pool.clone()).update(&pet).await?;
        info!(pet_id = id, "Pet updated");
        Ok(updated)
    }

    /// Records a vaccine for an active pet.
    pub async fn add_vaccine(&self, pet_id: i64, input: NewVaccine) -> DbResult<Vaccine> {
        let candidate = NewVaccine {
            vaccine_name: validate_name("vaccine_name", &input.vaccine_name)?,
            ..input
        };

        self.active_pet(pet_id).await?;

        let vaccine = VaccineRepository::new(self.pool.clone())
            .insert(pet_id, &candidate)
            .await?;
        info!(vaccine_id = vaccine.id, pet_id, "Vaccine recorded");
        Ok(vaccine)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Applies an inventory patch. `quantity` is an absolute recount.
    pub async fn update_inventory_item(
        &self,
        id: i64,
        mut patch: InventoryItemPatch,
    ) -> DbResult<InventoryItem> {
        let repo = InventoryRepository::new(self.pool.clone());
        let mut item = repo
            .get_active(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))?;

        if let Some(product_name) = &patch.product_name {
            let product_name = validate_name("product_name", product_name)?;
            self.ledger().ensure_name_unique(&product_name, Some(id)).await?;
            patch.product_name = Some(product_name);
        }
        if let Some(quantity) = patch.quantity {
            validate_non_negative("quantity", quantity)?;
        }
        if let Some(price) = patch.unit_price_cents {
            validate_price_cents("unit_price_cents", price)?;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            validate_non_negative("low_stock_threshold", threshold)?;
        }

        patch.apply_to(&mut item);

        match repo.update(&item).await {
            Ok(updated) => {
                info!(item_id = id, quantity = updated.quantity, "Inventory item updated");
                Ok(updated)
            }
            Err(err) if err.is_unique_violation_on("inventory") => {
                self.ledger().ensure_name_unique(&item.product_name, Some(id)).await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    // =========================================================================
    // Soft Delete
    // =========================================================================

    /// Marks a row inactive. Deleting a sale does not restock.
    pub async fn soft_delete(&self, kind: EntityKind, id: i64) -> DbResult<()> {
        debug!(entity = %kind, id, "Soft-deleting");
        repository::soft_delete(&self.pool, kind, id).await?;
        info!(entity = %kind, id, "Soft-deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
