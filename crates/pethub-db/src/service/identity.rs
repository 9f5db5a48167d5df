//! # Identity Registry
//!
//! Registration of customers and employees with their uniqueness rules.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register_customer(NewCustomer)                                        │
//! │       │                                                                 │
//! │       ├── name empty / too long?          → Validation                 │
//! │       ├── phone empty or < 10 digits?      → InvalidPhone               │
//! │       ├── CPF checksum wrong?             → InvalidTaxId               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  active customer with same phone OR CPF?  → DuplicateCustomer          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ──► unique index fires (lost race)                             │
//! │       │        └── re-query the winner    → DuplicateCustomer          │
//! │       ▼                                                                 │
//! │  Customer                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Employees follow the same flow, but only the CPF must be unique.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{CustomerRepository, EmployeeRepository};
use pethub_core::normalize::{format_tax_id, parse_phone, parse_tax_id};
use pethub_core::validation::{validate_name, validate_optional_text};
use pethub_core::{CoreError, Customer, Employee, NewCustomer, NewEmployee};

/// Registers customers and employees, keeping phone/CPF unique among
/// active rows.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    pool: SqlitePool,
}

impl IdentityRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        IdentityRegistry { pool }
    }

    fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Validates, normalizes and inserts a customer.
    ///
    /// ## Errors
    /// * `Validation` - name missing or too long
    /// * `InvalidPhone` / `InvalidTaxId` - identity fields rejected
    /// * `DuplicateCustomer` - an active customer owns the phone or CPF
    pub async fn register_customer(&self, input: NewCustomer) -> DbResult<Customer> {
        let candidate = NewCustomer {
            name: validate_name("name", &input.name)?,
            phone: parse_phone(&input.phone)?,
            address: validate_optional_text("address", input.address.as_deref())?,
            tax_id: parse_tax_id(&input.tax_id)?,
        };

        self.ensure_customer_unique(&candidate.phone, &candidate.tax_id, None)
            .await?;

        match self.customers().insert(&candidate).await {
            Ok(customer) => {
                info!(id = customer.id, tax_id = %format_tax_id(&customer.tax_id), "Customer registered");
                Ok(customer)
            }
            Err(err) if err.is_unique_violation_on("customers") => {
                // Lost a race with a concurrent registration
                self.ensure_customer_unique(&candidate.phone, &candidate.tax_id, None)
                    .await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Fails with `DuplicateCustomer` if another active customer (not
    /// `exclude_id`) already has `phone` or `tax_id`. Both must be
    /// normalized.
    pub async fn ensure_customer_unique(
        &self,
        phone: &str,
        tax_id: &str,
        exclude_id: Option<i64>,
    ) -> DbResult<()> {
        let Some(existing) = self
            .customers()
            .find_conflict(phone, tax_id, exclude_id)
            .await?
        else {
            return Ok(());
        };

        let field = if existing.phone == phone { "phone" } else { "CPF" };
        warn!(existing_id = existing.id, field, "Duplicate customer rejected");

        Err(CoreError::DuplicateCustomer {
            id: existing.id,
            name: existing.name,
            field: field.to_string(),
        }
        .into())
    }

    // =========================================================================
    // Employees
    // =========================================================================

    /// Validates, normalizes and inserts an employee.
    ///
    /// ## Errors
    /// * `Validation` - name or job title missing
    /// * `InvalidPhone` / `InvalidTaxId`
    /// * `DuplicateEmployee` - an active employee owns the CPF
    pub async fn register_employee(&self, input: NewEmployee) -> DbResult<Employee> {
        let candidate = NewEmployee {
            name: validate_name("name", &input.name)?,
            job_title: validate_name("job_title", &input.job_title)?,
            phone: parse_phone(&input.phone)?,
            tax_id: parse_tax_id(&input.tax_id)?,
        };

        self.ensure_employee_unique(&candidate.tax_id, None).await?;

        match self.employees().insert(&candidate).await {
            Ok(employee) => {
                info!(id = employee.id, "Employee registered");
                Ok(employee)
            }
            Err(err) if err.is_unique_violation_on("employees") => {
                self.ensure_employee_unique(&candidate.tax_id, None).await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Fails with `DuplicateEmployee` if another active employee (not
    /// `exclude_id`) already has `tax_id`.
    pub async fn ensure_employee_unique(&self, tax_id: &str, exclude_id: Option<i64>) -> DbResult<()> {
        match self.employees().find_conflict(tax_id, exclude_id).await? {
            None => Ok(()),
            Some(existing) => {
                warn!(existing_id = existing.id, "Duplicate employee rejected");
                Err(DbError::Core(CoreError::DuplicateEmployee {
                    id: existing.id,
                    name: existing.name,
                }))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
