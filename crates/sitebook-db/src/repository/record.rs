//! # Monetary Record Repository
//!
//! Expenses, salary payments and platform payments share one table and one
//! repository; [`RecordKind`] selects the collection and the code tag.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    records().create(tenant, input)                      │
//! │                                                                         │
//! │  input.validate() ── fails → DbError::Validation (nothing written)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├─ generate_code()  → ABCEXP007                                      │
//! │   ├─ INSERT records   → UNIQUE(tenant_id, code) hit? reserve again     │
//! │   │                     (at most MAX_CODE_ATTEMPTS codes)              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any other error drops the transaction: no row, no consumed number.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::sequence::{generate_code, skip_taken_codes, MAX_CODE_ATTEMPTS};
use sitebook_core::{
    CurrencyCode, DashboardSummary, Money, MonetaryRecord, NewMonetaryRecord, RecordKind,
    RecordUpdate,
};

const SELECT_COLUMNS: &str = "SELECT id, tenant_id, code, kind, amount_cents, currency, category, \
     description, occurred_on, created_at, updated_at FROM records";

/// Raw `records` row. Currency may be NULL on rows written before it was
/// required.
#[derive(Debug, FromRow)]
struct RecordRow {
    id: String,
    tenant_id: String,
    code: String,
    kind: RecordKind,
    amount_cents: i64,
    currency: Option<String>,
    category: String,
    description: Option<String>,
    occurred_on: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecordRow> for MonetaryRecord {
    fn from(row: RecordRow) -> Self {
        MonetaryRecord {
            id: row.id,
            tenant_id: row.tenant_id,
            code: row.code,
            kind: row.kind,
            amount: Money::from_cents(row.amount_cents),
            currency: CurrencyCode::normalize(row.currency.as_deref()),
            category: row.category,
            description: row.description,
            occurred_on: row.occurred_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filter for [`RecordRepository::list`].
///
/// `since` and `until` are inclusive.
///
/// ## Example
/// ```rust,ignore
/// let filter = RecordFilter::new(&tenant.id)
///     .kind(RecordKind::Expense)
///     .since(today - Duration::days(30));
/// let records = db.records().list(&filter).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub tenant_id: String,
    pub kind: Option<RecordKind>,
    pub category: Option<String>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl RecordFilter {
    /// All records of one tenant.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        RecordFilter {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }
}

/// Repository for monetary record operations.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    pool: SqlitePool,
}

impl RecordRepository {
    /// Creates a new RecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecordRepository { pool }
    }

    /// Creates a record with a freshly generated business code.
    ///
    /// ## Returns
    /// * `Ok(MonetaryRecord)` - the stored record, code included
    /// * `Err(DbError::Validation)` - input rejected, nothing written
    /// * `Err(DbError::TenantNotFound)` - unknown tenant
    /// * `Err(DbError::CodeGenerationFailed)` - every reserved code was taken
    pub async fn create(&self, tenant_id: &str, input: NewMonetaryRecord) -> DbResult<MonetaryRecord> {
        input.validate()?;

        let entity = input.kind.entity_type();
        let now = Utc::now();
        let mut record = MonetaryRecord {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            code: String::new(),
            kind: input.kind,
            amount: Money::from_cents(input.amount_cents),
            currency: input.currency_code(),
            category: input.category.trim().to_string(),
            description: clean_description(input.description),
            occurred_on: input.occurred_on,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            record.code = generate_code(&mut tx, tenant_id, entity).await?;

            match insert_row(&mut tx, &record).await {
                Ok(()) => {
                    tx.commit().await?;
                    info!(
                        tenant_id = %tenant_id,
                        code = %record.code,
                        kind = %record.kind,
                        "Record created"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_code_collision() => {
                    skip_taken_codes(&mut tx, tenant_id, entity, &record.code, attempt).await?
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::CodeGenerationFailed {
            entity,
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Gets a record by its business code.
    pub async fn get_by_code(&self, tenant_id: &str, code: &str) -> DbResult<Option<MonetaryRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ?1 AND code = ?2"
        ))
        .bind(tenant_id)
        .bind(code.trim().to_ascii_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MonetaryRecord::from))
    }

    /// Gets a record by its ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<MonetaryRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ?1 AND id = ?2"
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MonetaryRecord::from))
    }

    /// Lists records matching the filter, newest first.
    ///
    /// Ordered by `occurred_on` then `code`, both descending.
    pub async fn list(&self, filter: &RecordFilter) -> DbResult<Vec<MonetaryRecord>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        query.push(" WHERE tenant_id = ").push_bind(filter.tenant_id.clone());

        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.trim().to_string());
        }
        if let Some(since) = filter.since {
            query.push(" AND occurred_on >= ").push_bind(since);
        }
        if let Some(until) = filter.until {
            query.push(" AND occurred_on <= ").push_bind(until);
        }
        query.push(" ORDER BY occurred_on DESC, code DESC");

        let rows = query
            .build_query_as::<RecordRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(tenant_id = %filter.tenant_id, count = rows.len(), "Listed records");
        Ok(rows.into_iter().map(MonetaryRecord::from).collect())
    }

    /// Overwrites amount, currency and metadata. The code never changes.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such record for this tenant
    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        update: RecordUpdate,
    ) -> DbResult<MonetaryRecord> {
        update.validate()?;

        debug!(tenant_id = %tenant_id, id = %id, "Updating record");

        let result = sqlx::query(
            r#"
            UPDATE records SET
                amount_cents = ?3,
                currency = ?4,
                category = ?5,
                description = ?6,
                occurred_on = ?7,
                updated_at = ?8
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(update.amount_cents)
        .bind(update.currency_code().as_str())
        .bind(update.category.trim())
        .bind(clean_description(update.description.clone()))
        .bind(update.occurred_on)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Record", id));
        }

        self.get_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Record", id))
    }

    /// Hard-deletes a record. Its code is never handed out again.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(tenant_id = %tenant_id, id = %id, "Deleting record");

        let result = sqlx::query("DELETE FROM records WHERE tenant_id = ?1 AND id = ?2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Record", id));
        }

        Ok(())
    }

    /// Counts a tenant's records of one kind.
    pub async fn count(&self, tenant_id: &str, kind: RecordKind) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE tenant_id = ?1 AND kind = ?2")
                .bind(tenant_id)
                .bind(kind.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Statistic cards and category breakdown for the records matching
    /// `filter`, normally one collection and optionally one category.
    ///
    /// All figures come from a single read, so they agree with each other.
    pub async fn summary(&self, filter: &RecordFilter, today: NaiveDate) -> DbResult<DashboardSummary> {
        let records = self.list(filter).await?;
        Ok(DashboardSummary::build(&records, today))
    }
}

async fn insert_row(conn: &mut SqliteConnection, record: &MonetaryRecord) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO records (
            id, tenant_id, code, kind, amount_cents, currency,
            category, description, occurred_on, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&record.id)
    .bind(&record.tenant_id)
    .bind(&record.code)
    .bind(record.kind.as_str())
    .bind(record.amount.cents())
    .bind(record.currency.as_str())
    .bind(&record.category)
    .bind(&record.description)
    .bind(record.occurred_on)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
