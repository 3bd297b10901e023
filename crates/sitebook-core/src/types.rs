//! # Domain Types
//!
//! Core domain types used throughout SiteBook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Tenant      │   │ MonetaryRecord  │   │    Employee     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  code ABCEXP007 │   │  code ABCEMP0012│       │
//! │  │  code_prefix    │   │  kind           │   │  full_name      │       │
//! │  │  (immutable)    │   │  amount (Money) │   │  monthly_salary │       │
//! │  └─────────────────┘   │  currency       │   └─────────────────┘       │
//! │                        │  category       │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │   EntityType    │   │   RecordKind    │                              │
//! │  │  EXP SAL EMP PAY│   │  Expense        │                              │
//! │  │  pad 3 / 4      │   │  SalaryPayment  │                              │
//! │  └─────────────────┘   │  PlatformPayment│                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every row has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `code`: business code - human-readable, shown to end users

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::currency::CurrencyCode;
use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::validation::{self, ValidationResult};

// =============================================================================
// Tenant
// =============================================================================

/// A company account owning an isolated slice of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    /// Namespaces every business code this tenant mints. Stored upper-case.
    pub code_prefix: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Entity Type
// =============================================================================

/// The closed set of collections that carry business codes.
///
/// | Variant         | Tag | Pad |
/// |-----------------|-----|-----|
/// | Expense         | EXP | 3   |
/// | SalaryPayment   | SAL | 3   |
/// | Employee        | EMP | 4   |
/// | PlatformPayment | PAY | 3   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Expense,
    SalaryPayment,
    Employee,
    PlatformPayment,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Expense,
        EntityType::SalaryPayment,
        EntityType::Employee,
        EntityType::PlatformPayment,
    ];

    /// The tag embedded in generated codes.
    pub const fn tag(&self) -> &'static str {
        match self {
            EntityType::Expense => "EXP",
            EntityType::SalaryPayment => "SAL",
            EntityType::Employee => "EMP",
            EntityType::PlatformPayment => "PAY",
        }
    }

    /// Minimum number of digits in the sequence part.
    pub const fn pad_width(&self) -> usize {
        match self {
            EntityType::Employee => 4,
            _ => 3,
        }
    }

    /// The record kind stored for this entity, if it is monetary.
    pub const fn record_kind(&self) -> Option<RecordKind> {
        match self {
            EntityType::Expense => Some(RecordKind::Expense),
            EntityType::SalaryPayment => Some(RecordKind::SalaryPayment),
            EntityType::PlatformPayment => Some(RecordKind::PlatformPayment),
            EntityType::Employee => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.tag() == tag)
            .ok_or_else(|| CoreError::UnknownEntityTag(s.to_string()))
    }
}

// =============================================================================
// Record Kind
// =============================================================================

/// Which monetary collection a record belongs to.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Site expense (materials, equipment rental, fuel...).
    Expense,
    /// Salary paid to an employee.
    SalaryPayment,
    /// Subscription payment to the platform.
    PlatformPayment,
}

impl RecordKind {
    pub const fn entity_type(&self) -> EntityType {
        match self {
            RecordKind::Expense => EntityType::Expense,
            RecordKind::SalaryPayment => EntityType::SalaryPayment,
            RecordKind::PlatformPayment => EntityType::PlatformPayment,
        }
    }

    /// Column value in the `records.kind` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::SalaryPayment => "salary_payment",
            RecordKind::PlatformPayment => "platform_payment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Monetary Record
// =============================================================================

/// A persisted financial transaction: expense, salary or platform payment.
///
/// Currency is already normalized (see [`CurrencyCode::normalize`]). Amounts
/// from imported history are kept as stored even when not positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonetaryRecord {
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub kind: RecordKind,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub category: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub occurred_on: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a monetary record, as submitted by a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMonetaryRecord {
    pub kind: RecordKind,
    pub amount_cents: i64,
    /// Absent means USD.
    pub currency: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

impl NewMonetaryRecord {
    /// Checks the creation-time invariants.
    ///
    /// ## Rules
    /// - amount strictly positive
    /// - category present, at most 100 characters
    /// - currency, when given, a 3-letter code
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_amount_cents(self.amount_cents)?;
        validation::validate_category(&self.category)?;
        validation::validate_optional_currency(self.currency.as_deref())?;
        validation::validate_description(self.description.as_deref())?;
        Ok(())
    }

    /// The currency this record will be stored under.
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::normalize(self.currency.as_deref())
    }
}

/// Edit input: overwrites amount, currency and metadata of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

impl RecordUpdate {
    /// Same rules as [`NewMonetaryRecord::validate`].
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_amount_cents(self.amount_cents)?;
        validation::validate_category(&self.category)?;
        validation::validate_optional_currency(self.currency.as_deref())?;
        validation::validate_description(self.description.as_deref())?;
        Ok(())
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::normalize(self.currency.as_deref())
    }
}

// =============================================================================
// Employee
// =============================================================================

/// A tenant's employee. Carries an `EMP` code but no amount of its own;
/// salary payments are separate monetary records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub full_name: String,
    pub position: Option<String>,
    pub monthly_salary: Option<Money>,
    pub salary_currency: CurrencyCode,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub position: Option<String>,
    pub monthly_salary_cents: Option<i64>,
    pub salary_currency: Option<String>,
}

impl NewEmployee {
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_person_name(&self.full_name)?;
        if let Some(cents) = self.monthly_salary_cents {
            if cents < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "monthly salary".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }
        validation::validate_optional_currency(self.salary_currency.as_deref())?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(amount_cents: i64) -> NewMonetaryRecord {
        NewMonetaryRecord {
            kind: RecordKind::Expense,
            amount_cents,
            currency: None,
            category: "materials".to_string(),
            description: None,
            occurred_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        }
    }

    #[test]
    fn test_entity_tags_and_widths() {
        assert_eq!(EntityType::Expense.tag(), "EXP");
        assert_eq!(EntityType::SalaryPayment.tag(), "SAL");
        assert_eq!(EntityType::Employee.tag(), "EMP");
        assert_eq!(EntityType::PlatformPayment.tag(), "PAY");

        assert_eq!(EntityType::Expense.pad_width(), 3);
        assert_eq!(EntityType::PlatformPayment.pad_width(), 3);
        assert_eq!(EntityType::Employee.pad_width(), 4);
    }

    #[test]
    fn test_entity_type_from_tag() {
        assert_eq!("exp".parse::<EntityType>().unwrap(), EntityType::Expense);
        assert_eq!("PAY".parse::<EntityType>().unwrap(), EntityType::PlatformPayment);
        assert!("INV".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_record_kind_maps_to_entity() {
        for kind in [
            RecordKind::Expense,
            RecordKind::SalaryPayment,
            RecordKind::PlatformPayment,
        ] {
            assert_eq!(kind.entity_type().record_kind(), Some(kind));
        }
        assert_eq!(EntityType::Employee.record_kind(), None);
    }

    #[test]
    fn test_new_record_validation() {
        assert!(new_expense(1).validate().is_ok());
        assert!(matches!(
            new_expense(0).validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(new_expense(-100).validate().is_err());

        let mut blank_category = new_expense(100);
        blank_category.category = "  ".to_string();
        assert!(blank_category.validate().is_err());

        let mut bad_currency = new_expense(100);
        bad_currency.currency = Some("DOLLARS".to_string());
        assert!(bad_currency.validate().is_err());
    }

    #[test]
    fn test_new_record_currency_defaults_to_usd() {
        assert_eq!(new_expense(100).currency_code(), CurrencyCode::usd());
    }

    #[test]
    fn test_new_employee_validation() {
        let employee = NewEmployee {
            full_name: "Amina Haddad".to_string(),
            position: Some("Site foreman".to_string()),
            monthly_salary_cents: Some(320_000),
            salary_currency: Some("eur".to_string()),
        };
        assert!(employee.validate().is_ok());

        let unnamed = NewEmployee {
            full_name: String::new(),
            ..employee.clone()
        };
        assert!(unnamed.validate().is_err());

        let negative = NewEmployee {
            monthly_salary_cents: Some(-1),
            ..employee
        };
        assert!(negative.validate().is_err());
    }
}
