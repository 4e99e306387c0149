//! # Seed Data Loader
//!
//! Resets the database to a known sample inventory for development.
//!
//! ## Usage
//! ```bash
//! # Clear and repopulate ./data/sweetshop.db, then print statistics
//! cargo run -p sweetshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p sweetshop-db --bin seed -- --db ./data/dev.db
//!
//! # Only clear (ids restart at 1)
//! cargo run -p sweetshop-db --bin seed -- --clear
//! ```
//!
//! ## Sample Inventory
//! Five categories of Indian sweets, four or five items each, 24 in all.

use std::env;

/// Stock level below which the seed report lists an item for reordering.
const REORDER_BELOW: i64 = 10;

use sweetshop_core::{InventoryStats, Money, NewSweet, Sweet};
use sweetshop_db::{Database, DbConfig, SweetRepository};

/// (category, [(name, price in cents, in_stock)])
const SAMPLE_DATA: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Milk-based Sweets",
        &[
            ("Gulab Jamun", 1500, 30),
            ("Rasgulla", 1250, 35),
            ("Rasmalai", 1800, 25),
            ("Kheer", 2200, 20),
            ("Sandesh", 1650, 28),
        ],
    ),
    (
        "Dry Sweets",
        &[
            ("Ladoo", 1000, 40),
            ("Barfi", 1400, 35),
            ("Jalebi", 1100, 45),
            ("Soan Papdi", 1350, 30),
            ("Besan Ladoo", 1200, 38),
        ],
    ),
    (
        "Festival Specials",
        &[
            ("Modak", 2000, 25),
            ("Puran Poli", 2500, 20),
            ("Gujiya", 1850, 30),
            ("Karanji", 1700, 32),
        ],
    ),
    (
        "North Indian Sweets",
        &[
            ("Peda", 1500, 35),
            ("Kulfi", 1900, 28),
            ("Phirni", 2400, 22),
            ("Shahi Tukda", 2800, 18),
            ("Gajar Ka Halwa", 2650, 25),
        ],
    ),
    (
        "South Indian Sweets",
        &[
            ("Payasam", 2300, 20),
            ("Mysore Pak", 2100, 30),
            ("Pongal", 1600, 35),
            ("Kesari", 1450, 40),
            ("Coconut Burfi", 1950, 28),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/sweetshop.db");
    let mut clear_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--clear" => clear_only = true,
            "--help" | "-h" => {
                println!("SweetShop Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/sweetshop.db)");
                println!("      --clear        Delete all sweets and stop");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("🍬 SweetShop Seed Data Loader");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let repo = db.sweets();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let deleted = repo.clear().await?;
    println!("✓ Cleared {} existing sweets", deleted);

    if clear_only {
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Populating sample inventory...");
    let inserted = populate(&repo).await?;
    println!("✓ Inserted {} sweets", inserted);

    let sweets = repo.list_all().await?;
    print_statistics(&sweets);

    db.close().await;
    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Inserts every sample sweet, category by category.
async fn populate(repo: &SweetRepository) -> Result<usize, Box<dyn std::error::Error>> {
    let mut inserted = 0;

    for (category, items) in SAMPLE_DATA {
        println!("  Adding {}...", category);
        for (name, cents, in_stock) in items.iter() {
            let new = NewSweet::new(*name, *category, Money::from_cents(*cents), *in_stock);
            repo.insert(&new).await?;
            inserted += 1;
        }
    }

    Ok(inserted)
}

fn print_statistics(sweets: &[Sweet]) {
    let stats = InventoryStats::from_sweets(sweets);

    println!();
    println!("📊 Inventory Statistics");
    println!("=======================");
    println!("Total items: {}", stats.total_sweets);
    println!("Total units: {}", stats.total_units);

    println!();
    println!("Items by category:");
    for (category, count) in &stats.by_category {
        let in_category: Vec<&Sweet> = sweets
            .iter()
            .filter(|s| &s.category == category)
            .collect();
        let price_sum: Money = in_category.iter().map(|s| s.price).sum();
        let units: i64 = in_category.iter().map(|s| s.in_stock).sum();
        let value: Money = in_category.iter().map(|s| s.stock_value()).sum();
        println!(
            "  {}: {} items, avg price {}, total stock {}, value {}",
            category,
            count,
            price_sum.average_over(*count),
            units,
            value
        );
    }

    println!();
    println!("Total inventory value: {}", stats.total_value);
    println!("Average price: {}", stats.average_price);

    let low = reorder_list(sweets);
    if !low.is_empty() {
        println!();
        println!("⚠ Low stock (< {}):", REORDER_BELOW);
        for sweet in low {
            println!("  {} ({}): {} in stock", sweet.name, sweet.category, sweet.in_stock);
        }
    }
}

/// Items under `REORDER_BELOW`, lowest stock first.
fn reorder_list(sweets: &[Sweet]) -> Vec<&Sweet> {
    let mut low: Vec<&Sweet> = sweets
        .iter()
        .filter(|s| s.in_stock < REORDER_BELOW)
        .collect();
    low.sort_by_key(|s| s.in_stock);
    low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_list_uses_report_threshold() {
        let now = chrono::Utc::now();
        let sweets: Vec<Sweet> = [("Kheer", 9), ("Ladoo", 10), ("Modak", 0), ("Peda", 6)]
            .iter()
            .enumerate()
            .map(|(i, (name, in_stock))| Sweet {
                id: i as i64 + 1,
                name: name.to_string(),
                category: "Test".to_string(),
                price: Money::from_cents(1000),
                in_stock: *in_stock,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let names: Vec<&str> = reorder_list(&sweets).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Modak", "Peda", "Kheer"]);
    }

    #[test]
    fn test_sample_data_is_valid() {
        for (category, items) in SAMPLE_DATA {
            for (name, cents, in_stock) in items.iter() {
                let new = NewSweet::new(*name, *category, Money::from_cents(*cents), *in_stock);
                assert!(sweetshop_core::validation::validate_new_sweet(&new).is_ok());
            }
        }
    }
}
