//! # Seed Data Generator
//!
//! Populates the database with demo members, products, cart lines and
//! points for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by CART_DATABASE_PATH (default ./cart.db)
//! cargo run -p cart-db --bin seed
//!
//! # Specify database path
//! cargo run -p cart-db --bin seed -- --db ./data/cart.db
//!
//! # Seed, then check out the first member's cart
//! cargo run -p cart-db --bin seed -- --demo
//! ```
//!
//! ## Generated Data
//! - Two members: `hardy@example.com` and `jamie@example.com`
//! - One product per entry in [`PRODUCTS`]
//! - A cart for each member
//! - Starting points for each member, one record expiring soon and one later
//!
//! Everything is written in one unit of work: either all of it lands or
//! none of it does.

use chrono::{Duration, Utc};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cart_core::{Member, NewPoint, OrderRequest, Product};
use cart_db::repository::product::NewProduct;
use cart_db::{AppConfig, Database, OrderQueryService, OrderService};

/// (name, price, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Margherita Pizza", 20_000, 25),
    ("Caesar Salad", 5_000, 40),
    ("Cola 500ml", 1_500, 200),
    ("Garlic Bread", 3_500, 60),
    ("Tiramisu", 6_000, 15),
    ("Sparkling Water", 1_200, 150),
];

/// (member email, product index, quantity)
const CART_LINES: &[(&str, usize, i64)] = &[
    ("hardy@example.com", 0, 2),
    ("hardy@example.com", 1, 1),
    ("hardy@example.com", 2, 3),
    ("jamie@example.com", 3, 1),
    ("jamie@example.com", 4, 2),
];

const MEMBERS: &[&str] = &["hardy@example.com", "jamie@example.com"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = AppConfig::load()?;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--demo" => demo = true,
            "--help" | "-h" => {
                println!("Cart Order Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: CART_DATABASE_PATH or ./cart.db)");
                println!("      --demo         Place an order from the first member's cart");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), "Seeding database");

    let db = Database::new(config.db_config()).await?;

    let mut uow = db.begin().await?;
    if uow.members().find_by_email("hardy@example.com").await?.is_some() {
        println!("⚠ Database already has demo members");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    let mut members: Vec<Member> = Vec::with_capacity(MEMBERS.len());
    for email in MEMBERS {
        members.push(uow.members().insert(email).await?);
    }

    let mut products: Vec<Product> = Vec::with_capacity(PRODUCTS.len());
    for (name, price, stock) in PRODUCTS {
        let product = uow
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                price: *price,
                image_url: format!(
                    "https://img.example/{}.png",
                    name.to_lowercase().replace(' ', "-")
                ),
                stock: *stock,
            })
            .await?;
        products.push(product);
    }

    let mut cart_lines: Vec<(i64, i64)> = Vec::new();
    for (email, product_idx, quantity) in CART_LINES {
        let Some(member) = members.iter().find(|m| m.email == *email) else {
            continue;
        };
        let Some(product) = products.get(*product_idx) else {
            continue;
        };
        let item = uow.cart_items().insert(member.id, product.id, *quantity).await?;
        cart_lines.push((member.id, item.id));
    }

    for member in &members {
        for (amount, days) in [(1_000, 3), (2_500, 30)] {
            uow.points()
                .create(&NewPoint {
                    member_id: member.id,
                    earned_point: amount,
                    left_point: amount,
                    created_at: now,
                    expired_at: now + Duration::days(days),
                })
                .await?;
        }
    }

    uow.commit().await?;

    println!("✓ Seeded {} members", members.len());
    println!("✓ Seeded {} products", products.len());
    println!("✓ Seeded {} cart lines", cart_lines.len());
    println!("✓ Seeded {} point records", members.len() * 2);

    if let (true, Some(member)) = (demo, members.first()) {
        let cart_item_ids: Vec<i64> = cart_lines
            .iter()
            .filter(|(member_id, _)| *member_id == member.id)
            .map(|(_, id)| *id)
            .collect();

        let total_price: i64 = CART_LINES
            .iter()
            .filter(|(email, _, _)| *email == member.email)
            .filter_map(|(_, idx, qty)| products.get(*idx).map(|p| p.price * qty))
            .sum();

        let request = OrderRequest {
            cart_item_ids,
            total_price,
            point: 1_500,
        };

        let order_id = OrderService::from_config(db.clone(), &config)?
            .place_order(member, &request)
            .await?;
        let view = OrderQueryService::new(db.clone())
            .get_order(member, order_id)
            .await?;

        println!();
        println!("✓ Placed order {} for {}", view.order_id, member.email);
        for item in &view.items {
            println!("    {} x{} @ {}", item.name, item.quantity, item.price);
        }
        println!("  Total:  {}", view.total_price);
        println!("  Used:   {} points", view.used_point);
        println!("  Earned: {} points", view.earned_point);
    }

    db.close().await;
    Ok(())
}
