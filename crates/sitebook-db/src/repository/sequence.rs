//! # Sequence Repository
//!
//! Per-tenant, per-entity code counters.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 generate_code(tx, tenant, EXP)                          │
//! │                                                                         │
//! │  BEGIN (caller)                                                         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPSERT code_sequences ──► first use: max(row count, top code) + 1      │
//! │    │                       later:     last_value + 1                    │
//! │    │  no row returned → TenantNotFound                                  │
//! │    ▼                                                                    │
//! │  SELECT code_prefix    ──► "ABC"                                        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  format_code("ABC", EXP, 7) = "ABCEXP007"                               │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  INSERT row (caller)  ── collision → skip_taken_codes, retry            │
//! │  COMMIT (caller)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The upsert is the first statement the reservation runs, so a deferred
//! transaction takes the write lock before it reads anything. Two writers
//! serialize on that lock (waiting up to the pool's busy timeout) instead of
//! both reading the same count.

use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use sitebook_core::code::{format_code, next_sequence};
use sitebook_core::EntityType;

/// How many codes one insert may burn through before giving up.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Repository for code sequence counters.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: SqlitePool,
}

impl SequenceRepository {
    /// Creates a new SequenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SequenceRepository { pool }
    }

    /// Reserves and returns the next code in its own transaction.
    ///
    /// Mostly useful for tools; creating a record goes through
    /// [`generate_code`] inside the record's own transaction.
    pub async fn generate(&self, tenant_id: &str, entity: EntityType) -> DbResult<String> {
        let mut tx = self.pool.begin().await?;
        let code = generate_code(&mut tx, tenant_id, entity).await?;
        tx.commit().await?;
        Ok(code)
    }

    /// The last reserved value, or `None` before the first reservation.
    pub async fn current_value(&self, tenant_id: &str, entity: EntityType) -> DbResult<Option<u64>> {
        let mut conn = self.pool.acquire().await?;
        last_value(&mut conn, tenant_id, entity).await
    }

    /// The sequence the next creation would most likely receive.
    ///
    /// A preview for create forms. Nothing is reserved, so a concurrent
    /// create can take this number first.
    pub async fn peek_next_sequence(&self, tenant_id: &str, entity: EntityType) -> DbResult<u64> {
        let mut conn = self.pool.acquire().await?;

        ensure_tenant(&mut conn, tenant_id).await?;

        let last = match last_value(&mut conn, tenant_id, entity).await? {
            Some(value) => value,
            None => existing_seed(&mut conn, tenant_id, entity).await?,
        };

        Ok(next_sequence(last))
    }
}

/// Reserves the next sequence for `(tenant_id, entity)` and formats the code.
///
/// `conn` is normally a transaction that goes on to insert the row; the
/// reservation commits or rolls back together with it.
///
/// ## Errors
/// - [`DbError::TenantNotFound`] when the tenant doesn't exist
pub async fn generate_code(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    entity: EntityType,
) -> DbResult<String> {
    let sequence = reserve(conn, tenant_id, entity).await?;

    let prefix: String = sqlx::query_scalar("SELECT code_prefix FROM tenants WHERE id = ?1")
        .bind(tenant_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::TenantNotFound(tenant_id.to_string()))?;

    let code = format_code(&prefix, entity, sequence);
    debug!(tenant_id = %tenant_id, entity = %entity, code = %code, "Reserved code");
    Ok(code)
}

/// Moves the counter past every code already taken before the caller retries.
///
/// A collision means rows hold codes the counter never issued (imported or
/// written before the counter existed). The counter jumps to the highest such
/// number, so the next reservation is free and the jump commits with the row.
pub(crate) async fn skip_taken_codes(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    entity: EntityType,
    code: &str,
    attempt: u32,
) -> DbResult<()> {
    warn!(
        entity = %entity,
        code = %code,
        attempt,
        max_attempts = MAX_CODE_ATTEMPTS,
        "Code already taken, reserving another"
    );

    let sql = format!(
        r#"
        UPDATE code_sequences
        SET last_value = max(last_value, ({}))
        WHERE tenant_id = ?1 AND entity_tag = ?2
        "#,
        highest_sql(entity)
    );

    sqlx::query(&sql)
        .bind(tenant_id)
        .bind(entity.tag())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn reserve(conn: &mut SqliteConnection, tenant_id: &str, entity: EntityType) -> DbResult<u64> {
    // The SELECT over tenants yields no row for an unknown tenant, so nothing
    // is inserted and nothing is returned.
    let sql = format!(
        r#"
        INSERT INTO code_sequences (tenant_id, entity_tag, last_value)
        SELECT ?1, ?2, ({}) + 1 FROM tenants WHERE id = ?1
        ON CONFLICT (tenant_id, entity_tag) DO UPDATE SET last_value = last_value + 1
        RETURNING last_value
        "#,
        seed_sql(entity)
    );

    let value = bind_seed(sqlx::query_scalar::<_, i64>(&sql), tenant_id, entity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::TenantNotFound(tenant_id.to_string()))?;

    Ok(value as u64)
}

/// The table holding codes of this entity.
fn table(entity: EntityType) -> &'static str {
    match entity.record_kind() {
        Some(_) => "records",
        None => "employees",
    }
}

/// Highest number among the tenant's (`?1`) existing codes with this
/// entity's tag (`?2`), or 0.
fn highest_sql(entity: EntityType) -> String {
    format!(
        "SELECT COALESCE(MAX(CAST(substr(c.code, length(p.code_prefix || ?2) + 1) AS INTEGER)), 0) \
         FROM {table} AS c, (SELECT code_prefix FROM tenants WHERE id = ?1) AS p \
         WHERE c.tenant_id = ?1 \
         AND substr(c.code, 1, length(p.code_prefix || ?2)) = p.code_prefix || ?2",
        table = table(entity)
    )
}

/// The value a fresh counter starts from: the larger of the row count
/// (`COUNT(*)` numbering of older data) and the highest existing code.
/// Record kinds filter the count on `?3`.
fn seed_sql(entity: EntityType) -> String {
    let count = match entity.record_kind() {
        Some(_) => "SELECT COUNT(*) FROM records WHERE tenant_id = ?1 AND kind = ?3",
        None => "SELECT COUNT(*) FROM employees WHERE tenant_id = ?1",
    };
    format!("max(({}), ({}))", count, highest_sql(entity))
}

fn bind_seed<'q>(
    query: sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
    tenant_id: &'q str,
    entity: EntityType,
) -> sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>> {
    let query = query.bind(tenant_id).bind(entity.tag());
    match entity.record_kind() {
        Some(kind) => query.bind(kind.as_str()),
        None => query,
    }
}

async fn existing_seed(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    entity: EntityType,
) -> DbResult<u64> {
    let sql = format!("SELECT {}", seed_sql(entity));
    let seed = bind_seed(sqlx::query_scalar::<_, i64>(&sql), tenant_id, entity)
        .fetch_one(&mut *conn)
        .await?;
    Ok(seed as u64)
}

async fn last_value(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    entity: EntityType,
) -> DbResult<Option<u64>> {
    let value: Option<i64> = sqlx::query_scalar(
        "SELECT last_value FROM code_sequences WHERE tenant_id = ?1 AND entity_tag = ?2",
    )
    .bind(tenant_id)
    .bind(entity.tag())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(value.map(|v| v as u64))
}

async fn ensure_tenant(conn: &mut SqliteConnection, tenant_id: &str) -> DbResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tenants WHERE id = ?1")
        .bind(tenant_id)
        .fetch_optional(&mut *conn)
        .await?;

    match exists {
        Some(_) => Ok(()),
        None => Err(DbError::TenantNotFound(tenant_id.to_string())),
    }
}
