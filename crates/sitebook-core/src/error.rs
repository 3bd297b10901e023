//! # Error Types
//!
//! Domain-specific error types for sitebook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sitebook-core errors (this file)                                      │
//! │  ├── CoreError        - Code parsing and domain errors                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sitebook-db errors (separate crate)                                   │
//! │  └── DbError          - Storage, tenant lookup, code generation        │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → presentation layer message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation never produces an error: empty input and zero totals resolve
//! to empty maps and `0.0` percentages.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity tag outside the closed `EXP`/`SAL`/`EMP`/`PAY` set.
    #[error("Unknown entity tag: {0}")]
    UnknownEntityTag(String),

    /// A business code that doesn't match `<PREFIX><TAG><DIGITS>`.
    ///
    /// ## When This Occurs
    /// - Code belongs to another tenant (prefix mismatch)
    /// - Sequence part is empty or not numeric
    #[error("Invalid business code '{code}': {reason}")]
    InvalidCode { code: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any code is generated or row is written. The message is
/// surfaced to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid currency, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidCode {
            code: "XYZEXP001".to_string(),
            reason: "prefix mismatch".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid business code 'XYZEXP001': prefix mismatch"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("category");
        assert_eq!(err.to_string(), "category is required");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("amount").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
