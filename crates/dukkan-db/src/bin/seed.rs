//! # Seed Data Generator
//!
//! Populates the database with test catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 items (default)
//! cargo run -p dukkan-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p dukkan-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p dukkan-db --bin seed -- --db ./data/dukkan.db
//! ```
//!
//! ## Generated Catalog
//! Creates realistic corner-shop data across categories:
//! - Beverages (sodas, water, juice)
//! - Snacks (chips, chocolate, biscuits)
//! - Dairy (milk, cheese, yogurt)
//! - Household (soap, paper, batteries)
//! - Grocery (bread, pasta, canned goods)
//!
//! Each item has:
//! - Realistic name with a size variant
//! - 13-digit barcode (most of them; loose goods go without)
//! - Price 0.80 - 7.49 and a cost at 60-80% of price
//! - Stock 0 - 100

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;

use dukkan_core::{Category, Item};
use dukkan_db::repository::category::generate_category_id;
use dukkan_db::repository::item::generate_item_id;
use dukkan_db::{Database, DbConfig};

/// Categories with base item names for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Cola",
            "Orange Soda",
            "Lemon Soda",
            "Mineral Water",
            "Sparkling Water",
            "Apple Juice",
            "Orange Juice",
            "Grape Juice",
            "Iced Tea",
            "Energy Drink",
            "Coffee",
            "Green Tea",
            "Black Tea",
            "Chocolate Milk",
            "Lemonade",
            "Mango Nectar",
            "Peach Nectar",
            "Tonic Water",
            "Ginger Ale",
            "Barley Drink",
        ],
    ),
    (
        "Snacks",
        &[
            "Potato Chips",
            "Corn Chips",
            "Salted Peanuts",
            "Roasted Almonds",
            "Chocolate Bar",
            "Milk Chocolate",
            "Dark Chocolate",
            "Wafer Biscuits",
            "Butter Cookies",
            "Sandwich Biscuits",
            "Gummy Candy",
            "Hard Candy",
            "Chewing Gum",
            "Pretzel Sticks",
            "Popcorn",
            "Crackers",
            "Sesame Bar",
            "Halva",
            "Dates Box",
            "Fig Rolls",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk",
            "Skim Milk",
            "UHT Milk",
            "Natural Yogurt",
            "Fruit Yogurt",
            "Greek Yogurt",
            "White Cheese",
            "Cheddar Cheese",
            "Cream Cheese",
            "Processed Cheese",
            "Butter",
            "Margarine",
            "Fresh Cream",
            "Sour Cream",
            "Eggs Dozen",
            "Eggs Half Dozen",
            "Labneh",
            "Mozzarella",
            "Ricotta",
            "Condensed Milk",
        ],
    ),
    (
        "Household",
        &[
            "Dish Soap",
            "Laundry Powder",
            "Bleach",
            "Sponges",
            "Trash Bags",
            "Paper Towels",
            "Toilet Paper",
            "Hand Soap",
            "Shampoo",
            "Toothpaste",
            "Toothbrush",
            "Matches",
            "Candles",
            "Batteries AA",
            "Batteries AAA",
            "Light Bulb",
            "Air Freshener",
            "Glass Cleaner",
            "Floor Cleaner",
            "Clothes Pegs",
        ],
    ),
    (
        "Grocery",
        &[
            "White Bread",
            "Whole Wheat Bread",
            "Flour",
            "Sugar",
            "Salt",
            "Rice",
            "Spaghetti",
            "Penne",
            "Couscous",
            "Lentils",
            "Chickpeas",
            "White Beans",
            "Tomato Paste",
            "Canned Tuna",
            "Canned Sardines",
            "Olive Oil",
            "Sunflower Oil",
            "Vinegar",
            "Black Pepper",
            "Paprika",
        ],
    ),
];

/// Size variants with price addons in cents
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Large", 60),
    ("330ml", 0),
    ("500ml", 30),
    ("1L", 80),
    ("1.5L", 110),
    ("250g", 0),
    ("500g", 40),
    ("1kg", 90),
    ("Pack of 6", 150),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=dukkan_db=debug surfaces per-query logs while seeding
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./dukkan_dev.db");

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
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dukkan POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./dukkan_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Dukkan POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing items
    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Create categories first; items reference them
    println!();
    println!("Creating categories...");

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, _) in CATEGORIES {
        let category = Category {
            id: generate_category_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        db.categories().insert(&category).await?;
        category_ids.push(category.id);
    }
    println!("✓ Created {} categories", category_ids.len());

    // Generate items
    println!();
    println!("Generating items...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (_, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, base_name) in names.iter().enumerate() {
            for (size_idx, (size_name, price_addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let item = generate_item(
                    &category_ids[category_idx],
                    base_name,
                    size_name,
                    *price_addon,
                    category_idx * 1000 + name_idx * SIZES.len() + size_idx,
                );

                if let Err(e) = db.items().insert(&item).await {
                    eprintln!("Failed to insert {}: {}", item.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} items...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} items/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    // Verify search works against the fresh catalog
    println!();
    println!("Verifying search...");
    let hits = db.items().search("cola", 10).await?;
    println!("  Search 'cola': {} results", hits.len());

    let hits = db.items().search("milk", 10).await?;
    println!("  Search 'milk': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single item with realistic data.
fn generate_item(
    category_id: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> Item {
    let now = Utc::now();

    // 13-digit barcode (not a valid checksum); loose goods get none
    let barcode = if seed % 7 == 0 {
        None
    } else {
        Some(format!("590{:010}", seed))
    };

    // Price: base 0.80 - 5.99 plus size addon
    let base_price = 80 + ((seed * 17) % 520) as i64;
    let price_cents = base_price + price_addon;

    // Cost at 60-80% of price
    let cost_pct = 60 + (seed % 20) as i64;
    let cost_cents = price_cents * cost_pct / 100;

    Item {
        id: generate_item_id(),
        name: format!("{} {}", name, size),
        category_id: Some(category_id.to_string()),
        barcode,
        price_cents,
        cost_cents,
        stock_count: (seed % 101) as i64,
        photo_path: None,
        created_at: now,
        updated_at: now,
    }
}
