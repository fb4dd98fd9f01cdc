//! # Seed Data
//!
//! Loads the ROSE menu and creates the first admin account.
//!
//! ## Usage
//! ```bash
//! # Menu only
//! cargo run -p rose-db --bin seed
//!
//! # Menu + admin account
//! cargo run -p rose-db --bin seed -- --email owner@rose.co --password 'secreto'
//!
//! # Specify database path (or set ROSE_DB_PATH)
//! cargo run -p rose-db --bin seed -- --db ./data/rose.db
//! ```
//!
//! Existing data is left alone: the menu is skipped when any product
//! exists, the admin when the email is already registered.

use rose_db::{hash_password, Database, DbConfig, NewProduct, NewTopping};
use std::env;

/// (name, price, takes toppings, first topping free)
const PRODUCTS: &[(&str, i64, bool, bool)] = &[
    ("Fresas con crema", 5000, true, true),
    ("Malteadas", 12000, true, false),
    ("Waffles", 9000, true, true),
    ("Brownie con helado", 8000, true, false),
    ("Ensalada de frutas", 7000, true, true),
    ("Limonada de coco", 6000, false, false),
    ("Café", 3000, false, false),
];

const TOPPINGS: &[(&str, i64)] = &[
    ("Helado", 2000),
    ("Fresas", 1000),
    ("Queso", 1000),
    ("Oreo", 800),
    ("Arequipe", 800),
    ("Chocolate", 800),
    ("Chispas", 500),
    ("Maní", 500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("ROSE_DB_PATH").unwrap_or_else(|_| String::from("./rose_dev.db"));
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--email" | "-e" => {
                if i + 1 < args.len() {
                    email = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ROSE POS Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./rose_dev.db)");
                println!("  -e, --email <EMAIL>      Admin account email");
                println!("  -p, --password <PASS>    Admin account password");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ROSE POS Seed");
    println!("================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Menu
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products, skipping menu", existing);
    } else {
        for (name, price, has_toppings, discounted) in PRODUCTS {
            let mut product = NewProduct::new(*name, *price);
            if !has_toppings {
                product = product.without_toppings();
            }
            if *discounted {
                product = product.with_first_topping_discounted();
            }
            db.products().insert(&product).await?;
        }
        for (name, price) in TOPPINGS {
            db.toppings().insert(&NewTopping::new(*name, *price)).await?;
        }
        println!(
            "✓ Loaded {} products and {} toppings",
            PRODUCTS.len(),
            TOPPINGS.len()
        );
    }

    // Admin account
    match (email, password) {
        (Some(email), Some(password)) => {
            if db.admins().find_by_email(&email).await?.is_some() {
                println!("⚠ Admin {} already exists, skipping", email);
            } else {
                let hash = hash_password(&password)?;
                let user = db.admins().create_user(&email, &hash).await?;
                println!("✓ Created admin {} (id {})", user.email, user.id);
            }
        }
        (None, None) => {
            println!("  No --email/--password given, no admin account created");
        }
        _ => {
            eprintln!("✗ --email and --password must be given together");
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
