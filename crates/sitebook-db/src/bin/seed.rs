//! # Seed Data Generator
//!
//! Populates the database with a demo tenant for development.
//!
//! ## Usage
//! ```bash
//! # Demo tenant "DEMO" with 60 days of expenses (default)
//! cargo run -p sitebook-db --bin seed
//!
//! # Custom prefix and history length
//! cargo run -p sitebook-db --bin seed -- --prefix ACME --days 120
//!
//! # Specify database path
//! cargo run -p sitebook-db --bin seed -- --db ./data/sitebook.db
//! ```
//!
//! ## Generated Data
//! - Expenses across materials, fuel, equipment and permits in USD, EUR
//!   and GBP, with a few left without currency (stored as USD)
//! - A handful of employees with monthly salary payments
//! - One platform subscription payment per month

use chrono::{Duration, Utc};
use sitebook_core::{NewEmployee, NewMonetaryRecord, RecordKind};
use sitebook_db::config::init_tracing;
use sitebook_db::{AppConfig, Database};
use std::env;
use std::path::PathBuf;

/// Expense categories with a base amount in cents.
const EXPENSE_CATEGORIES: &[(&str, i64)] = &[
    ("materials", 48_500),
    ("fuel", 9_200),
    ("equipment", 125_000),
    ("permits", 30_000),
    ("subcontractors", 210_000),
];

/// Currencies cycled through; `None` exercises the USD default.
const CURRENCIES: &[Option<&str>] = &[Some("USD"), Some("EUR"), None, Some("GBP"), Some("usd")];

const EMPLOYEES: &[(&str, &str, i64)] = &[
    ("Ana Ruiz", "Site foreman", 420_000),
    ("Ben Okafor", "Electrician", 360_000),
    ("Chen Wei", "Carpenter", 340_000),
    ("Dara Novak", "Crane operator", 390_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 60;
    let mut prefix = String::from("DEMO");
    let mut db_path: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--prefix" | "-p" => {
                if i + 1 < args.len() {
                    prefix = args[i + 1].clone();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("SiteBook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>       Days of history to generate (default: 60)");
                println!("  -p, --prefix <CODE>  Tenant code prefix (default: DEMO)");
                println!("  -d, --db <PATH>      Database file path (overrides config)");
                println!("      --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = AppConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = PathBuf::from(path);
    }
    init_tracing(&config.log_level);

    println!("SiteBook Seed Data Generator");
    println!("============================");
    println!("Database: {}", config.database.path.display());
    println!("Prefix:   {}", prefix);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.tenants().get_by_prefix(&prefix).await?.is_some() {
        println!("⚠ Tenant {} already exists", prefix.to_ascii_uppercase());
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let tenant = db.tenants().create("Demo Construction Co.", &prefix).await?;
    println!("✓ Created tenant {} ({})", tenant.name, tenant.code_prefix);

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut created = 0usize;

    // Expenses: one or two per day, cycling categories and currencies
    for day in 0..days {
        let per_day = 1 + (day % 2) as usize;
        for n in 0..per_day {
            let seed = day as usize * 2 + n;
            let (category, base) = EXPENSE_CATEGORIES[seed % EXPENSE_CATEGORIES.len()];
            let input = NewMonetaryRecord {
                kind: RecordKind::Expense,
                amount_cents: base + ((seed * 1_337) % 10_000) as i64,
                currency: CURRENCIES[seed % CURRENCIES.len()].map(str::to_string),
                category: category.to_string(),
                description: Some(format!("Site delivery #{}", seed + 1)),
                occurred_on: today - Duration::days(day),
            };

            if let Err(e) = db.records().create(&tenant.id, input).await {
                eprintln!("Failed to insert expense: {}", e);
                continue;
            }
            created += 1;
        }
    }
    println!("✓ Generated {} expenses", created);

    // Employees and their monthly salary payments
    let months = (days / 30).max(1);
    for (name, position, salary) in EMPLOYEES {
        let employee = db
            .employees()
            .create(
                &tenant.id,
                NewEmployee {
                    full_name: name.to_string(),
                    position: Some(position.to_string()),
                    monthly_salary_cents: Some(*salary),
                    salary_currency: None,
                },
            )
            .await?;

        for month in 0..months {
            db.records()
                .create(
                    &tenant.id,
                    NewMonetaryRecord {
                        kind: RecordKind::SalaryPayment,
                        amount_cents: *salary,
                        currency: None,
                        category: "wages".to_string(),
                        description: Some(format!("Salary {}", employee.code)),
                        occurred_on: today - Duration::days(month * 30),
                    },
                )
                .await?;
        }
        println!("✓ Employee {} {} with {} payments", employee.code, name, months);
    }

    // Platform subscription
    for month in 0..months {
        db.records()
            .create(
                &tenant.id,
                NewMonetaryRecord {
                    kind: RecordKind::PlatformPayment,
                    amount_cents: 4_900,
                    currency: Some("USD".to_string()),
                    category: "subscription".to_string(),
                    description: None,
                    occurred_on: today - Duration::days(month * 30),
                },
            )
            .await?;
    }
    println!("✓ Generated {} platform payments", months);

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());
    println!("  Try: cargo run -p sitebook-db --bin report -- --prefix {}", tenant.code_prefix);

    db.close().await;
    Ok(())
}
