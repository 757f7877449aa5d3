//! PocketDB - One-shot schema migration
//!
//! Initializes or updates the personal-finance schema in a target database
//! directory. Safe to run repeatedly: existing tables are left untouched.

use anyhow::Context;
use pocketdb::Database;
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "data/pocket.db";

const REQUIRED_TABLES: [(&str, &str); 3] = [
    (
        "categories",
        "CREATE TABLE categories (
            id INT PRIMARY KEY,
            name VARCHAR UNIQUE,
            type VARCHAR
        )",
    ),
    (
        "transactions",
        "CREATE TABLE transactions (
            id INT PRIMARY KEY,
            category_id INT,
            amount FLOAT,
            description VARCHAR,
            date VARCHAR,
            type VARCHAR
        )",
    ),
    (
        "budgets",
        "CREATE TABLE budgets (
            id INT PRIMARY KEY,
            category_id INT,
            monthly_limit FLOAT,
            month VARCHAR
        )",
    ),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    println!("PocketDB migration");
    println!("Database path: {}", db_path);

    let mut db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at '{}'", db_path))?;

    let existing = db.list_tables();
    println!(
        "Found {} existing table(s): {}",
        existing.len(),
        if existing.is_empty() {
            "none".to_string()
        } else {
            existing.join(", ")
        }
    );

    for (table_name, create_sql) in REQUIRED_TABLES {
        if db.table_exists(table_name) {
            println!("  [ok] '{}' already exists", table_name);
        } else {
            db.execute(create_sql)
                .with_context(|| format!("failed to create table '{}'", table_name))?;
            println!("  [ok] '{}' created", table_name);
        }
    }

    println!("\nMigration summary:");
    for table_name in db.list_tables() {
        let row_count = db.table(&table_name).map_or(0, |t| t.row_count());
        println!("  - {}: {} row(s)", table_name, row_count);
    }
    println!("Migration completed successfully.");

    Ok(())
}
