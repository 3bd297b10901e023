//! # Validation Module
//!
//! Input validation for SiteBook forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form                                                     │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Runs BEFORE a business code is reserved                           │
//! │  └── Failure → transaction never starts, message shown unchanged       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (tenant_id, code)                                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sitebook_core::validation::{parse_date, validate_amount_cents};
//!
//! assert!(validate_amount_cents(12_50).is_ok());
//! assert!(parse_date("occurred_on", "2026-02-30").is_err());
//! ```

use chrono::NaiveDate;

use crate::currency::CurrencyCode;
use crate::error::ValidationError;
use crate::{MAX_AMOUNT_CENTS, MAX_CATEGORY_LEN, MAX_PREFIX_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a tenant code prefix.
///
/// ## Rules
/// - Must not be empty
/// - At most 10 characters
/// - ASCII letters and digits only (it is glued directly onto the entity tag)
///
/// ## Returns
/// The upper-cased prefix, as it will appear in every code.
pub fn validate_code_prefix(prefix: &str) -> ValidationResult<String> {
    let prefix = prefix.trim();

    if prefix.is_empty() {
        return Err(ValidationError::required("code prefix"));
    }

    if prefix.len() > MAX_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "code prefix".to_string(),
            max: MAX_PREFIX_LEN,
        });
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            "code prefix",
            "must contain only letters and digits",
        ));
    }

    Ok(prefix.to_ascii_uppercase())
}

/// Validates a tenant (company) name.
pub fn validate_tenant_name(name: &str) -> ValidationResult<()> {
    validate_bounded_text("company name", name, 200)
}

/// Validates an employee's full name.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    validate_bounded_text("full name", name, 200)
}

/// Validates a record category (e.g. "materials", "fuel").
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_bounded_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates an optional free-text description.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.len() > 1000 => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 1000,
        }),
        _ => Ok(()),
    }
}

fn validate_bounded_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Money & Currency Validators
// =============================================================================

/// Validates a record amount in cents.
///
/// ## Rules
/// - Must be strictly positive. Zero and negative amounts are rejected at
///   creation; historical rows that violate this are still aggregated.
/// - At most [`MAX_AMOUNT_CENTS`].
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a currency field that may be left blank (blank means USD).
pub fn validate_optional_currency(raw: Option<&str>) -> ValidationResult<()> {
    match raw {
        Some(code) if !code.trim().is_empty() => CurrencyCode::parse(code).map(|_| ()),
        _ => Ok(()),
    }
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` form date.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code_prefix() {
        assert_eq!(validate_code_prefix("abc").unwrap(), "ABC");
        assert_eq!(validate_code_prefix(" Bld2 ").unwrap(), "BLD2");

        assert!(validate_code_prefix("").is_err());
        assert!(validate_code_prefix("AB-C").is_err());
        assert!(validate_code_prefix(&"A".repeat(11)).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-500).is_err());

        assert!(validate_amount_cents(MAX_AMOUNT_CENTS).is_ok());
        assert!(matches!(
            validate_amount_cents(MAX_AMOUNT_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_amount_cents(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_optional_currency() {
        assert!(validate_optional_currency(None).is_ok());
        assert!(validate_optional_currency(Some("")).is_ok());
        assert!(validate_optional_currency(Some("gbp")).is_ok());
        assert!(validate_optional_currency(Some("pounds")).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("materials").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("occurred_on", "2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(matches!(
            parse_date("occurred_on", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_date("occurred_on", "19/10/2026"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
