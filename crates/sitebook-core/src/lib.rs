//! # sitebook-core: Pure Business Logic for SiteBook
//!
//! This crate holds the two reusable engines of the SiteBook back office as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SiteBook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Web presentation (out of this workspace)           │   │
//! │  │   Expense form ──► List page ──► Dashboard cards ──► Export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ sitebook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   code    │  │ aggregate │  │  currency │  │ validation│  │   │
//! │  │   │ ABCEXP007 │  │  buckets  │  │ USD rule  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  sitebook-db (Database Layer)                   │   │
//! │  │      SQLite queries, sequence counters, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Tenant, MonetaryRecord, Employee, EntityType)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`currency`] - ISO currency codes and the single USD default rule
//! - [`code`] - Business code formatting and parsing
//! - [`aggregate`] - Currency-bucketed aggregation and percentages
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use sitebook_core::code::format_code;
//! use sitebook_core::EntityType;
//!
//! let code = format_code("abc", EntityType::Expense, 6);
//! assert_eq!(code, "ABCEXP006");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod code;
pub mod currency;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{CategoryBucket, CurrencyBucket, CurrencyBuckets, DashboardSummary};
pub use code::BusinessCode;
pub use currency::CurrencyCode;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a tenant code prefix.
pub const MAX_PREFIX_LEN: usize = 10;

/// Maximum length of a record category tag.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Largest amount a single record may carry, in cents (one trillion major units).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;
