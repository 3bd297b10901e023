//! # Tenant Repository
//!
//! Companies using SiteBook. Each tenant owns a unique code prefix that
//! namespaces every business code it generates.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use sitebook_core::validation::{validate_code_prefix, validate_tenant_name};
use sitebook_core::Tenant;

#[derive(Debug, FromRow)]
struct TenantRow {
    id: String,
    name: String,
    code_prefix: String,
    created_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            code_prefix: row.code_prefix,
            created_at: row.created_at,
        }
    }
}

/// Repository for tenant database operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    /// Creates a new TenantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TenantRepository { pool }
    }

    /// Registers a tenant.
    ///
    /// The prefix is validated and stored upper-cased.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - empty name or malformed prefix
    /// * `Err(DbError::UniqueViolation)` - prefix taken by another tenant
    pub async fn create(&self, name: &str, code_prefix: &str) -> DbResult<Tenant> {
        validate_tenant_name(name)?;
        let code_prefix = validate_code_prefix(code_prefix)?;

        let tenant = Tenant {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            code_prefix,
            created_at: Utc::now(),
        };

        debug!(prefix = %tenant.code_prefix, "Inserting tenant");

        sqlx::query("INSERT INTO tenants (id, name, code_prefix, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&tenant.id)
            .bind(&tenant.name)
            .bind(&tenant.code_prefix)
            .bind(tenant.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                    field,
                    value: tenant.code_prefix.clone(),
                },
                other => other,
            })?;

        info!(id = %tenant.id, prefix = %tenant.code_prefix, "Tenant created");
        Ok(tenant)
    }

    /// Gets a tenant by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT id, name, code_prefix, created_at FROM tenants WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// Gets a tenant by its code prefix (case-insensitive).
    pub async fn get_by_prefix(&self, code_prefix: &str) -> DbResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT id, name, code_prefix, created_at FROM tenants WHERE code_prefix = ?1",
        )
        .bind(code_prefix.trim().to_ascii_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// Returns the tenant's code prefix.
    ///
    /// ## Returns
    /// * `Err(DbError::TenantNotFound)` - unknown tenant
    pub async fn code_prefix(&self, tenant_id: &str) -> DbResult<String> {
        sqlx::query_scalar("SELECT code_prefix FROM tenants WHERE id = ?1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::TenantNotFound(tenant_id.to_string()))
    }

    /// Lists all tenants by name.
    pub async fn list(&self) -> DbResult<Vec<Tenant>> {
        let rows = sqlx::query_as::<_, TenantRow>(
            "SELECT id, name, code_prefix, created_at FROM tenants ORDER BY name, code_prefix",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tenant::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use sitebook_core::ValidationError;

    #[tokio::test]
    async fn test_create_uppercases_prefix() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tenant = db.tenants().create("Acme Builders", " abc ").await.unwrap();
        assert_eq!(tenant.code_prefix, "ABC");

        assert_eq!(db.tenants().code_prefix(&tenant.id).await.unwrap(), "ABC");
        let found = db.tenants().get_by_prefix("abc").await.unwrap().unwrap();
        assert_eq!(found.id, tenant.id);
        assert_eq!(found.name, "Acme Builders");
    }

    #[tokio::test]
    async fn test_duplicate_prefix() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.tenants().create("Acme Builders", "ABC").await.unwrap();
        let err = db.tenants().create("Another", "abc").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "ABC"));
        assert!(!err.is_code_collision());
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.tenants().create("", "ABC").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Required { .. })));

        let err = db.tenants().create("Acme", "AB-C").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert!(db.tenants().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tenant() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.tenants().get_by_id("nope").await.unwrap().is_none());
        let err = db.tenants().code_prefix("nope").await.unwrap_err();
        assert!(matches!(err, DbError::TenantNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.tenants().create("Zenith Works", "ZEN").await.unwrap();
        db.tenants().create("Acme Builders", "ABC").await.unwrap();

        let names: Vec<_> = db.tenants().list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Acme Builders", "Zenith Works"]);
    }
}
