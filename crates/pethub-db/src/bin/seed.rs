//! # Seed Data Generator
//!
//! Populates a database with pet-shop data for development.
//!
//! ## Usage
//! ```bash
//! # 50 customers (default), with pets, staff, stock and today's bookings
//! cargo run -p pethub-db --bin seed
//!
//! # Custom amount
//! cargo run -p pethub-db --bin seed -- --customers 200
//!
//! # Specify database path
//! cargo run -p pethub-db --bin seed -- --db ./data/pethub.db
//! ```
//!
//! ## Generated Data
//! - Inventory: food, hygiene and accessories, a few of them already low
//! - Customers: checksum-valid CPFs and unique phones
//! - One or two pets per customer
//! - Employees: groomers, vets and a driver
//! - Bookings spread over today's opening hours
//!
//! Everything goes through the same services as the API, so seeded rows
//! satisfy every business rule.

use chrono::{NaiveDate, Utc};
use std::env;

use pethub_core::normalize::complete_tax_id;
use pethub_core::{NewBooking, NewCustomer, NewEmployee, NewInventoryItem, NewPet};
use pethub_db::{Database, DbConfig};

/// (product name, unit price in centavos, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Ração Premium Adulto 15kg", 18990, 40),
    ("Ração Premium Filhote 3kg", 6490, 25),
    ("Ração Gatos Castrados 10kg", 15990, 18),
    ("Sachê Gato Salmão", 390, 200),
    ("Petisco Bifinho", 1290, 60),
    ("Osso Nó Natural", 890, 4),
    ("Areia Sanitária 4kg", 2490, 30),
    ("Tapete Higiênico 30un", 5990, 12),
    ("Shampoo Neutro 500ml", 2550, 3),
    ("Condicionador Pelos Longos", 2990, 9),
    ("Antipulgas 10-20kg", 8990, 15),
    ("Vermífugo Comprimido", 3490, 22),
    ("Coleira Ajustável M", 2500, 5),
    ("Guia Retrátil 5m", 7990, 7),
    ("Caminha Média", 12990, 2),
    ("Comedouro Inox", 3290, 20),
    ("Arranhador Torre", 14990, 6),
    ("Bolinha de Borracha", 990, 45),
];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Felipe", "Gabriela", "Heitor", "Isabela", "João",
    "Larissa", "Marcos", "Natália", "Otávio", "Paula", "Rafael", "Sofia", "Tiago", "Vanessa",
    "William",
];

const LAST_NAMES: &[&str] = &[
    "Souza", "Oliveira", "Santos", "Lima", "Pereira", "Costa", "Ferreira", "Almeida", "Ribeiro",
    "Carvalho",
];

const STREETS: &[&str] = &[
    "Rua das Flores",
    "Av. Atlântica",
    "Rua do Catete",
    "Rua Voluntários da Pátria",
    "Estrada do Joá",
];

/// (name, breed, species)
const PETS: &[(&str, &str, &str)] = &[
    ("Rex", "Labrador", "Cachorro"),
    ("Mel", "SRD", "Gato"),
    ("Thor", "Golden Retriever", "Cachorro"),
    ("Luna", "Siamês", "Gato"),
    ("Bob", "Shih Tzu", "Cachorro"),
    ("Nina", "Persa", "Gato"),
    ("Pipoca", "Poodle", "Cachorro"),
    ("Frida", "Maine Coon", "Gato"),
    ("Paçoca", "Spitz Alemão", "Cachorro"),
    ("Tom", "SRD", "Gato"),
];

/// (name, job title)
const EMPLOYEES: &[(&str, &str)] = &[
    ("Carlos Mendes", "Tosador"),
    ("Daniela Rocha", "Tosadora"),
    ("Eduardo Nunes", "Veterinário"),
    ("Fernanda Dias", "Veterinária"),
    ("Gustavo Pires", "Motorista"),
];

const SERVICES: &[&str] = &["Banho", "Banho e Tosa", "Tosa Higiênica", "Consulta", "Vacinação"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut customers: usize = 50;
    let mut db_path = String::from("./pethub.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--customers" | "-c" => {
                if i + 1 < args.len() {
                    customers = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pet Control Hub Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --customers <N>  Number of customers to generate (default: 50)");
                println!("  -d, --db <PATH>      Database file path (default: ./pethub.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pet Control Hub Seed Data Generator");
    println!("======================================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", customers);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.customers().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Inventory
    println!();
    println!("Stocking inventory...");
    for (name, price, stock) in PRODUCTS {
        let item = NewInventoryItem {
            product_name: name.to_string(),
            quantity: *stock,
            unit_price_cents: *price,
            low_stock_threshold: None,
        };
        if let Err(e) = db.ledger().create_item(item).await {
            eprintln!("Failed to insert {}: {}", name, e);
        }
    }
    println!("  {} products", PRODUCTS.len());

    // Staff
    println!("Hiring staff...");
    let mut employee_ids = Vec::new();
    for (idx, (name, job_title)) in EMPLOYEES.iter().enumerate() {
        let employee = NewEmployee {
            name: name.to_string(),
            job_title: job_title.to_string(),
            phone: format!("2130{:06}", 1000 + idx),
            tax_id: generate_tax_id(900_000 + idx),
        };
        match db.identity().register_employee(employee).await {
            Ok(e) => employee_ids.push(e.id),
            Err(e) => eprintln!("Failed to register {}: {}", name, e),
        }
    }
    println!("  {} employees", employee_ids.len());

    // Customers and pets
    println!("Registering customers and pets...");
    let mut pet_ids = Vec::new();
    let mut registered = 0;
    for idx in 0..customers {
        let name = format!(
            "{} {}",
            FIRST_NAMES[idx % FIRST_NAMES.len()],
            LAST_NAMES[(idx / FIRST_NAMES.len() + idx) % LAST_NAMES.len()]
        );
        let customer = NewCustomer {
            name: name.clone(),
            phone: format!("(21) 9{:04}-{:04}", 7000 + idx / 10_000, idx % 10_000),
            address: Some(format!("{}, {}", STREETS[idx % STREETS.len()], 10 + idx * 3)),
            tax_id: generate_tax_id(idx),
        };

        let customer = match db.identity().register_customer(customer).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to register {}: {}", name, e);
                continue;
            }
        };
        registered += 1;

        let pet_count = 1 + idx % 2;
        for offset in 0..pet_count {
            let (pet_name, breed, species) = PETS[(idx * 3 + offset) % PETS.len()];
            let pet = NewPet {
                name: pet_name.to_string(),
                breed: breed.to_string(),
                species: species.to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2016 + (idx % 9) as i32, 1 + (idx % 12) as u32, 1 + (idx % 28) as u32),
                customer_id: customer.id,
            };
            match db.coordinator().create_pet(pet).await {
                Ok(p) => pet_ids.push(p.id),
                Err(e) => eprintln!("Failed to register pet {}: {}", pet_name, e),
            }
        }

        if registered % 25 == 0 {
            println!("  Registered {} customers...", registered);
        }
    }
    println!("  {} customers, {} pets", registered, pet_ids.len());

    // Today's bookings: every employee gets one slot per hour, 9h to 17h
    println!("Filling today's schedule...");
    let today = Utc::now().date_naive();
    let mut booked = 0;
    if !pet_ids.is_empty() {
        for (e_idx, employee_id) in employee_ids.iter().enumerate() {
            for hour in 9..18u32 {
                let slot = (e_idx * 9 + hour as usize) % (pet_ids.len() + 3);
                let Some(pet_id) = pet_ids.get(slot) else {
                    continue;
                };
                let Some(scheduled_time) = today.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let booking = NewBooking {
                    service_name: SERVICES[(e_idx + hour as usize) % SERVICES.len()].to_string(),
                    scheduled_time: scheduled_time.and_utc(),
                    pet_id: *pet_id,
                    employee_id: *employee_id,
                    delivery: hour % 3 == 0,
                };
                match db.coordinator().create_booking(booking).await {
                    Ok(_) => booked += 1,
                    Err(e) => eprintln!("Failed to book: {}", e),
                }
            }
        }
    }
    println!("  {} bookings", booked);

    let elapsed = start.elapsed();
    let kpis = db.dashboard().kpis().await?;

    println!();
    println!("✓ Seeded in {:?}", elapsed);
    println!(
        "  Dashboard: {} customers, {} bookings, {} sales",
        kpis.total_customers, kpis.total_bookings, kpis.total_sales
    );
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Deterministic checksum-valid CPF for the `n`th generated person.
fn generate_tax_id(n: usize) -> String {
    let base = 100_000_000 + (n * 7_919) % 800_000_000;
    complete_tax_id(&format!("{:09}", base)).unwrap_or_default()
}
