//! # Dashboard Report
//!
//! Prints the statistic cards and category breakdown a list page shows.
//!
//! ## Usage
//! ```bash
//! cargo run -p sitebook-db --bin report -- --prefix DEMO
//! cargo run -p sitebook-db --bin report -- --prefix DEMO --kind salary_payment
//! cargo run -p sitebook-db --bin report -- --prefix DEMO --category fuel
//! cargo run -p sitebook-db --bin report -- --prefix DEMO --json
//! ```

use chrono::Utc;
use sitebook_core::aggregate::{round_for_display, sorted_by_total};
use sitebook_core::validation::parse_date;
use sitebook_core::{CurrencyBucket, CurrencyBuckets, CurrencyCode, DashboardSummary, RecordKind};
use sitebook_db::config::init_tracing;
use sitebook_db::{AppConfig, Database, RecordFilter};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut prefix: Option<String> = None;
    let mut kind = RecordKind::Expense;
    let mut category: Option<String> = None;
    let mut as_of = Utc::now().date_naive();
    let mut json = false;
    let mut db_path: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--prefix" | "-p" => {
                if i + 1 < args.len() {
                    prefix = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--kind" | "-k" => {
                if i + 1 < args.len() {
                    kind = parse_kind(&args[i + 1])?;
                    i += 1;
                }
            }
            "--category" | "-c" => {
                if i + 1 < args.len() {
                    category = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--date" => {
                if i + 1 < args.len() {
                    as_of = parse_date("date", &args[i + 1])?;
                    i += 1;
                }
            }
            "--json" => json = true,
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
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let Some(prefix) = prefix else {
        print_help();
        return Err("--prefix is required".into());
    };

    let mut config = AppConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = PathBuf::from(path);
    }
    init_tracing(&config.log_level);

    let db = Database::new(config.db_config()).await?;

    let tenant = db
        .tenants()
        .get_by_prefix(&prefix)
        .await?
        .ok_or_else(|| format!("No tenant with prefix {}", prefix.to_ascii_uppercase()))?;

    let mut filter = RecordFilter::new(&tenant.id).kind(kind);
    if let Some(category) = category {
        filter = filter.category(category);
    }
    let summary = db.records().summary(&filter, as_of).await?;
    db.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let preferred = config.display_currency();

    println!("{} ({}) - {} as of {}", tenant.name, tenant.code_prefix, kind, summary.as_of);
    println!();

    if summary.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    print_cards("All time", &summary.all_time, &preferred);
    print_cards("Last 7 days", &summary.last_7_days, &preferred);
    print_cards("Last 30 days", &summary.last_30_days, &preferred);
    print_categories(&summary);

    Ok(())
}

fn parse_kind(raw: &str) -> Result<RecordKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "expense" | "exp" => Ok(RecordKind::Expense),
        "salary_payment" | "salary" | "sal" => Ok(RecordKind::SalaryPayment),
        "platform_payment" | "platform" | "pay" => Ok(RecordKind::PlatformPayment),
        other => Err(format!(
            "Unknown kind '{}'. Valid options: expense, salary_payment, platform_payment",
            other
        )),
    }
}

/// Total-descending, with the configured currency pulled to the front.
fn display_order(buckets: &CurrencyBuckets, preferred: &CurrencyCode) -> Vec<(CurrencyCode, CurrencyBucket)> {
    let mut rows = sorted_by_total(buckets);
    if let Some(pos) = rows.iter().position(|(code, _)| code == preferred) {
        let row = rows.remove(pos);
        rows.insert(0, row);
    }
    rows
}

fn print_cards(title: &str, buckets: &CurrencyBuckets, preferred: &CurrencyCode) {
    println!("{}", title);
    if buckets.is_empty() {
        println!("  -");
    }
    for (currency, bucket) in display_order(buckets, preferred) {
        println!("  {} {:>14}  ({} records)", currency, bucket.total.to_string(), bucket.count);
    }
    println!();
}

fn print_categories(summary: &DashboardSummary) {
    println!("By category");
    for row in &summary.categories {
        let bar_len = (round_for_display(row.percent_of_currency) / 5.0).round() as usize;
        println!(
            "  {:<16} {} {:>14} {:>6.1}% {}",
            row.category,
            row.currency,
            row.total.to_string(),
            row.percent_of_currency,
            "#".repeat(bar_len.min(20))
        );
    }
}

fn print_help() {
    println!("SiteBook Dashboard Report");
    println!();
    println!("Usage: report --prefix <CODE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -p, --prefix <CODE>  Tenant code prefix");
    println!("  -k, --kind <KIND>    expense | salary_payment | platform_payment (default: expense)");
    println!("  -c, --category <TAG> Only records in this category");
    println!("      --date <DATE>    Report date, YYYY-MM-DD (default: today)");
    println!("      --json           Print the summary as JSON");
    println!("  -d, --db <PATH>      Database file path (overrides config)");
    println!("      --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}
