//! Dashboard summaries over stored records.

use chrono::NaiveDate;
use sitebook_core::{CurrencyCode, NewMonetaryRecord, RecordKind};
use sitebook_db::{Database, DbConfig, RecordFilter};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(kind: RecordKind, cents: i64, currency: Option<&str>, category: &str, on: NaiveDate) -> NewMonetaryRecord {
    NewMonetaryRecord {
        kind,
        amount_cents: cents,
        currency: currency.map(str::to_string),
        category: category.to_string(),
        description: None,
        occurred_on: on,
    }
}

fn expenses(tenant_id: &str) -> RecordFilter {
    RecordFilter::new(tenant_id).kind(RecordKind::Expense)
}

async fn setup() -> (Database, String) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let tenant = db.tenants().create("Acme Builders", "ABC").await.unwrap();
    (db, tenant.id)
}

#[tokio::test]
async fn empty_collection_gives_empty_summary() {
    let (db, tenant_id) = setup().await;

    let summary = db
        .records()
        .summary(&expenses(&tenant_id), date(2026, 10, 19))
        .await
        .unwrap();

    assert!(summary.is_empty());
    assert!(summary.last_7_days.is_empty());
    assert!(summary.categories.is_empty());
}

#[tokio::test]
async fn totals_are_bucketed_by_currency() {
    let (db, tenant_id) = setup().await;
    let today = date(2026, 10, 19);
    let repo = db.records();

    repo.create(&tenant_id, record(RecordKind::Expense, 1000, Some("USD"), "materials", today)).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 500, Some("EUR"), "materials", today)).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 250, None, "fuel", today)).await.unwrap();
    // A different collection never leaks into the expense summary.
    repo.create(&tenant_id, record(RecordKind::SalaryPayment, 99_999, None, "wages", today)).await.unwrap();

    let summary = repo.summary(&expenses(&tenant_id), today).await.unwrap();

    let usd = summary.all_time[&CurrencyCode::usd()];
    assert_eq!(usd.total.cents(), 1250);
    assert_eq!(usd.count, 2);

    let eur = summary.all_time[&CurrencyCode::normalize(Some("EUR"))];
    assert_eq!(eur.total.cents(), 500);
    assert_eq!(eur.count, 1);
    assert_eq!(summary.all_time.len(), 2);

    let materials_usd = summary
        .categories
        .iter()
        .find(|row| row.category == "materials" && row.currency.as_str() == "USD")
        .unwrap();
    assert_eq!(materials_usd.percent_of_currency, 80.0);

    let materials_eur = summary
        .categories
        .iter()
        .find(|row| row.category == "materials" && row.currency.as_str() == "EUR")
        .unwrap();
    assert_eq!(materials_eur.percent_of_currency, 100.0);
}

#[tokio::test]
async fn windows_follow_occurrence_date() {
    let (db, tenant_id) = setup().await;
    let today = date(2026, 10, 19);
    let repo = db.records();

    repo.create(&tenant_id, record(RecordKind::Expense, 100, None, "fuel", date(2026, 10, 18))).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 200, None, "fuel", date(2026, 10, 12))).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 400, None, "fuel", date(2026, 9, 25))).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 800, None, "fuel", date(2026, 8, 1))).await.unwrap();

    let summary = repo.summary(&expenses(&tenant_id), today).await.unwrap();
    let usd = CurrencyCode::usd();

    assert_eq!(summary.last_7_days[&usd].total.cents(), 300);
    assert_eq!(summary.last_30_days[&usd].total.cents(), 700);
    assert_eq!(summary.all_time[&usd].total.cents(), 1500);
}

#[tokio::test]
async fn historical_non_positive_amounts_are_summed() {
    let (db, tenant_id) = setup().await;
    let today = date(2026, 10, 19);

    db.records()
        .create(&tenant_id, record(RecordKind::Expense, 1000, None, "materials", today))
        .await
        .unwrap();

    // A refund imported from an older system.
    sqlx::query(
        "INSERT INTO records (id, tenant_id, code, kind, amount_cents, currency, category, \
         occurred_on, created_at, updated_at) \
         VALUES ('refund', ?1, 'ABCEXP900', 'expense', -300, 'USD', 'materials', '2026-10-10', \
         '2026-10-10T00:00:00Z', '2026-10-10T00:00:00Z')",
    )
    .bind(&tenant_id)
    .execute(db.pool())
    .await
    .unwrap();

    let summary = db.records().summary(&expenses(&tenant_id), today).await.unwrap();
    let usd = summary.all_time[&CurrencyCode::usd()];

    assert_eq!(usd.total.cents(), 700);
    assert_eq!(usd.count, 2);
}

#[tokio::test]
async fn summary_is_repeatable() {
    let (db, tenant_id) = setup().await;
    let today = date(2026, 10, 19);

    db.records()
        .create(&tenant_id, record(RecordKind::PlatformPayment, 4900, Some("USD"), "subscription", today))
        .await
        .unwrap();

    let filter = RecordFilter::new(&tenant_id).kind(RecordKind::PlatformPayment);
    let first = db.records().summary(&filter, today).await.unwrap();
    let second = db.records().summary(&filter, today).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn summary_can_be_scoped_to_one_category() {
    let (db, tenant_id) = setup().await;
    let today = date(2026, 10, 19);
    let repo = db.records();

    repo.create(&tenant_id, record(RecordKind::Expense, 1000, None, "materials", today)).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 300, Some("EUR"), "fuel", today)).await.unwrap();
    repo.create(&tenant_id, record(RecordKind::Expense, 200, None, "fuel", date(2026, 9, 1))).await.unwrap();

    let fuel = repo.summary(&expenses(&tenant_id).category("fuel"), today).await.unwrap();

    assert_eq!(fuel.all_time.len(), 2);
    assert_eq!(fuel.all_time[&CurrencyCode::usd()].total.cents(), 200);
    assert_eq!(fuel.all_time[&CurrencyCode::normalize(Some("EUR"))].total.cents(), 300);
    assert!(!fuel.last_30_days.contains_key(&CurrencyCode::usd()));
    assert!(fuel.categories.iter().all(|row| row.category == "fuel"));
    assert!(fuel.categories.iter().all(|row| row.percent_of_currency == 100.0));

    let unknown = repo.summary(&expenses(&tenant_id).category("scaffolding"), today).await.unwrap();
    assert!(unknown.is_empty());
}
