//! # sitebook-db: Database Layer for SiteBook
//!
//! This crate provides persistence for the SiteBook back office.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SiteBook Data Flow                               │
//! │                                                                         │
//! │  Presentation handler (create expense, list page)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   sitebook-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (record.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ TenantRepo    │    │ 001_initial  │  │   │
//! │  │   │ WAL + FKs     │    │ RecordRepo    │    │   _schema    │  │   │
//! │  │   │ busy timeout  │    │ EmployeeRepo  │    │              │  │   │
//! │  │   │               │    │ SequenceRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (tenant, record, employee, sequence)
//! - [`config`] - File and environment configuration for the binaries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitebook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("sitebook.db")).await?;
//!
//! let tenant = db.tenants().create("Acme Builders", "ABC").await?;
//! let record = db.records().create(&tenant.id, new_expense).await?;
//! assert_eq!(record.code, "ABCEXP001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::employee::EmployeeRepository;
pub use repository::record::{RecordFilter, RecordRepository};
pub use repository::sequence::{generate_code, SequenceRepository, MAX_CODE_ATTEMPTS};
pub use repository::tenant::TenantRepository;
