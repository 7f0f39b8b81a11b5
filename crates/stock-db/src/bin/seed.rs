//! # Seed Data Generator
//!
//! Populates the database with products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p stock-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stock-db --bin seed -- --count 2000
//!
//! # Specify database URL (falls back to DATABASE_URL)
//! cargo run -p stock-db --bin seed -- --db postgres://localhost/stock
//! ```
//!
//! Each product gets a name built from a base item and a size, a price
//! between $1.99 and $9.99 plus a size add-on, and a stock level of 0-100.

use std::env;

use stock_core::{NewProduct, ProductFilter, SortOrder};
use stock_db::{Database, DbConfig};

/// Categories with their base items.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Widgets",
        &[
            "Flange Widget",
            "Spring Widget",
            "Rotary Widget",
            "Hinge Widget",
            "Clamp Widget",
            "Pivot Widget",
        ],
    ),
    (
        "Fasteners",
        &[
            "Hex Bolt",
            "Carriage Bolt",
            "Wing Nut",
            "Lock Washer",
            "Wood Screw",
            "Rivet",
            "Anchor",
        ],
    ),
    (
        "Electrical",
        &[
            "Toggle Switch",
            "Fuse",
            "Relay",
            "Terminal Block",
            "Cable Tie",
            "Wire Nut",
        ],
    ),
    (
        "Plumbing",
        &[
            "Elbow Joint",
            "Ball Valve",
            "Pipe Coupling",
            "Tee Fitting",
            "Hose Clamp",
        ],
    ),
    (
        "Tools",
        &[
            "Screwdriver",
            "Adjustable Wrench",
            "Pliers",
            "Tape Measure",
            "Utility Knife",
            "Hammer",
        ],
    ),
];

/// Size variants with a price add-on in cents.
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 100),
    ("Large", 200),
    ("XL", 350),
    ("10-Pack", 300),
    ("50-Pack", 900),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut database_url = env::var("DATABASE_URL").ok();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    database_url = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stock Dashboard Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <URL>     Postgres URL (default: $DATABASE_URL)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let Some(database_url) = database_url else {
        eprintln!("No database given: pass --db <URL> or set DATABASE_URL");
        std::process::exit(2);
    };

    println!("🌱 Stock Dashboard Seed Data Generator");
    println!("=====================================");
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(database_url).min_connections(1)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().list(&ProductFilter::new()).await?.total;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category, items)) in CATEGORIES.iter().enumerate() {
        for (item_idx, item) in items.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(
                    category,
                    item,
                    size,
                    *price_addon,
                    category_idx * 1000 + item_idx * 20 + size_idx,
                );

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Verifying search...");
    let results = db.products().search("widget", SortOrder::Desc).await?;
    println!("  Search 'widget': {} results", results.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product with deterministic pseudo-random values.
fn generate_product(
    category: &str,
    item: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> NewProduct {
    // $1.99 - $9.99 base, plus size add-on
    let price_cents = 199 + ((seed * 17) % 800) as i64 + price_addon;

    NewProduct {
        name: format!("{} {}", item, size),
        price: price_cents as f64 / 100.0,
        stock: (seed % 101) as i32,
        category: category.to_string(),
    }
}
