//! Test fixtures shared by the repository and service test modules.

use std::sync::atomic::{AtomicU32, Ordering};
use std::path::Path;

use pethub_core::normalize::complete_tax_id;
use pethub_core::{Customer, Employee, InventoryItem, NewCustomer, NewEmployee, NewInventoryItem, NewPet, Pet};

use crate::pool::{Database, DbConfig};

static SEQ: AtomicU32 = AtomicU32::new(1);

fn next() -> u32 {
    SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Fresh migrated in-memory database.
pub(crate) async fn database() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// File-backed database with several connections, for race tests.
pub(crate) async fn file_database(dir: &Path) -> Database {
    let config = DbConfig::new(dir.join("pethub.db")).max_connections(4);
    Database::new(config).await.unwrap()
}

/// A checksum-valid CPF derived from `n`.
pub(crate) fn tax_id(n: u32) -> String {
    complete_tax_id(&format!("{:09}", 123_000_000 + n)).unwrap()
}

/// An 11-digit mobile number derived from `n`.
pub(crate) fn phone(n: u32) -> String {
    format!("2198{:07}", n)
}

pub(crate) async fn customer(db: &Database, name: &str) -> Customer {
    let n = next();
    db.customers()
        .insert(&NewCustomer {
            name: name.to_string(),
            phone: phone(n),
            address: None,
            tax_id: tax_id(n),
        })
        .await
        .unwrap()
}

pub(crate) async fn employee(db: &Database, name: &str) -> Employee {
    let n = next();
    db.employees()
        .insert(&NewEmployee {
            name: name.to_string(),
            job_title: "Tosador".to_string(),
            phone: phone(n),
            tax_id: tax_id(n),
        })
        .await
        .unwrap()
}

pub(crate) async fn pet(db: &Database, customer_id: i64, name: &str) -> Pet {
    db.pets()
        .insert(&NewPet {
            name: name.to_string(),
            breed: "SRD".to_string(),
            species: "Cachorro".to_string(),
            date_of_birth: None,
            customer_id,
        })
        .await
        .unwrap()
}

pub(crate) async fn item(db: &Database, name: &str, quantity: i64, unit_price_cents: i64) -> InventoryItem {
    db.inventory()
        .insert(&NewInventoryItem {
            product_name: name.to_string(),
            quantity,
            unit_price_cents,
            low_stock_threshold: None,
        })
        .await
        .unwrap()
}
