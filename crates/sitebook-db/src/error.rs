//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (sitebook-core) ──┐                                    │
//! │                                    │  raised before the transaction     │
//! │  SQLite Error (sqlx::Error) ───────┤                                    │
//! │                                    ▼                                    │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Presentation layer shows the message                                  │
//! │                                                                         │
//! │  Any error inside insert-with-code rolls the whole transaction back.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sitebook_core::{EntityType, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist, or belongs to another tenant
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The tenant id used to generate a code doesn't exist.
    ///
    /// Raised explicitly instead of formatting a code with a missing prefix.
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate tenant code prefix
    /// - Business code collision (handled by the retry loop first)
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Every attempt to mint a unique code collided.
    #[error("Could not generate a unique {entity} code after {attempts} attempts")]
    CodeGenerationFailed { entity: EntityType, attempts: u32 },

    /// Input rejected before any write.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when a unique violation hit a `code` column.
    pub fn is_code_collision(&self) -> bool {
        match self {
            DbError::UniqueViolation { field, .. } => {
                field.split(',').any(|column| column.trim().ends_with(".code"))
            }
            _ => false,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: records.tenant_id, records.code"
                if let Some(columns) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: columns.to_string(),
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_collision_detection() {
        assert!(DbError::duplicate("records.tenant_id, records.code", "x").is_code_collision());
        assert!(DbError::duplicate("employees.tenant_id, employees.code", "x").is_code_collision());
        assert!(!DbError::duplicate("tenants.code_prefix", "ABC").is_code_collision());
        assert!(!DbError::not_found("Record", "1").is_code_collision());
    }

    #[test]
    fn test_messages() {
        let err = DbError::CodeGenerationFailed {
            entity: EntityType::Expense,
            attempts: 5,
        };
        assert_eq!(
            err.to_string(),
            "Could not generate a unique EXP code after 5 attempts"
        );

        let err: DbError = ValidationError::required("category").into();
        assert_eq!(err.to_string(), "Validation failed: category is required");
    }

    #[tokio::test]
    async fn test_sqlite_errors_are_classified() {
        let db = crate::pool::Database::new(crate::pool::DbConfig::in_memory()).await.unwrap();
        let tenant = db.tenants().create("Acme Builders", "ABC").await.unwrap();

        let err: DbError = sqlx::query(
            "INSERT INTO tenants (id, name, code_prefix, created_at) \
             VALUES ('t2', 'Other', 'ABC', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "tenants.code_prefix"));

        let err: DbError = sqlx::query(
            "INSERT INTO code_sequences (tenant_id, entity_tag, last_value) \
             VALUES ('missing', 'EXP', 1)",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(matches!(err, DbError::QueryFailed(ref msg) if msg.contains("FOREIGN KEY")));

        assert!(db.tenants().get_by_id(&tenant.id).await.unwrap().is_some());
    }
}
