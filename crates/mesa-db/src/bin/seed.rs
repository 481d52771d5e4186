//! # Seed Data Generator
//!
//! Populates the database with development data: a handful of restaurant
//! owners, their restaurants and menus, a few customers, and one example
//! order so the lifecycle can be exercised immediately.
//!
//! ## Usage
//! ```bash
//! # Default database path (./mesa_dev.db)
//! cargo run -p mesa-db --bin seed
//!
//! # Specify database path
//! cargo run -p mesa-db --bin seed -- --db ./data/mesa.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use mesa_core::{MenuItem, OrderLineRequest, Restaurant, Role};
use mesa_db::repository::profile::new_profile;
use mesa_db::{Database, DbConfig};

/// (owner, restaurant name, address, menu of (dish, price cents))
const RESTAURANTS: &[(&str, &str, &str, &[(&str, i64)])] = &[
    (
        "owner-rosa",
        "Trattoria Rosa",
        "12 Via Roma",
        &[
            ("Margherita", 500),
            ("Quattro Formaggi", 750),
            ("Tiramisu", 350),
        ],
    ),
    (
        "owner-kim",
        "Seoul Kitchen",
        "48 Hangang-daero",
        &[
            ("Bibimbap", 899),
            ("Kimchi Jjigae", 799),
            ("Tteokbokki", 550),
        ],
    ),
    (
        "owner-ade",
        "Lagos Grill",
        "7 Marina Road",
        &[("Jollof Rice", 650), ("Suya Platter", 1200)],
    ),
];

const CUSTOMERS: &[&str] = &["cust-alice", "cust-bola", "cust-chen"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./mesa_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mesa Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mesa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mesa Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.orders().count().await? > 0 {
        println!("⚠ Database already has orders");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Admin + customer profiles
    db.profiles()
        .insert(&new_profile("admin-root", Role::Admin))
        .await?;
    for customer in CUSTOMERS {
        db.profiles()
            .insert(&new_profile(customer, Role::Customer))
            .await?;
    }

    // Owners with restaurants and menus
    let mut first_restaurant: Option<(String, Vec<MenuItem>)> = None;

    for (owner_id, name, address, menu) in RESTAURANTS {
        db.profiles()
            .insert(&new_profile(owner_id, Role::RestaurantOwner))
            .await?;

        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: format!("{} - seeded for development", name),
            address: address.to_string(),
            phone: "5550100".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.restaurants().insert(&restaurant).await?;

        let mut items = Vec::new();
        for (dish, price_cents) in *menu {
            let item = MenuItem {
                id: Uuid::new_v4().to_string(),
                restaurant_id: restaurant.id.clone(),
                name: dish.to_string(),
                description: String::new(),
                price_cents: *price_cents,
                is_available: true,
                created_at: now,
                updated_at: now,
            };
            db.menu_items().insert(&item).await?;
            items.push(item);
        }

        println!("  {} ({} items)", name, items.len());

        if first_restaurant.is_none() {
            first_restaurant = Some((restaurant.id.clone(), items));
        }
    }

    // One example order against the first restaurant
    if let Some((restaurant_id, items)) = first_restaurant {
        let lines: Vec<OrderLineRequest> = items
            .iter()
            .take(2)
            .map(|item| OrderLineRequest {
                menu_item_id: item.id.clone(),
                quantity: 1,
            })
            .collect();

        let created = db
            .orders()
            .create(
                CUSTOMERS[0],
                &restaurant_id,
                &lines,
                Some("seeded example order".to_string()),
            )
            .await?;

        println!();
        println!(
            "✓ Example order {} for {} ({} lines, total {})",
            created.order.id,
            CUSTOMERS[0],
            created.lines.len(),
            created.computed_total()
        );
    }

    println!();
    println!(
        "✓ Seed complete: {} orders, {} lines",
        db.orders().count().await?,
        db.orders().count_lines().await?
    );

    Ok(())
}
