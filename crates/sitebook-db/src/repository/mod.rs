//! # Repository Module
//!
//! Database repository implementations for SiteBook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Presentation handler                                                  │
//! │       │                                                                 │
//! │       │  db.records().create(&tenant_id, input)                        │
//! │       ▼                                                                 │
//! │  RecordRepository ──────► sequence::generate_code(&mut tx, ..)         │
//! │  ├── create / update / delete                                          │
//! │  ├── list(&RecordFilter)                                               │
//! │  └── summary(tenant, kind, today) ──► sitebook_core::aggregate         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TenantRepository`](tenant::TenantRepository) - Tenants and code prefixes
//! - [`RecordRepository`](record::RecordRepository) - Expenses, salary and platform payments
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Employees
//! - [`SequenceRepository`](sequence::SequenceRepository) - Code counters

pub mod employee;
pub mod record;
pub mod sequence;
pub mod tenant;
