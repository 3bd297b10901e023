//! # Business Codes
//!
//! Formatting and parsing of the human-readable identifiers shown to users.
//!
//! ## Code Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │     A B C   E X P   0 0 7                                               │
//! │     ─────   ─────   ─────                                               │
//! │       │       │       └── sequence, left-padded with '0'                │
//! │       │       │           (3 digits, 4 for EMP; never truncated)        │
//! │       │       └────────── entity tag (EXP / SAL / EMP / PAY)            │
//! │       └────────────────── tenant code prefix, upper-cased               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only formats. Reserving the sequence number is the database
//! layer's job (`sitebook_db::repository::sequence`), which hands the
//! reserved value to [`format_code`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::EntityType;

/// Formats a business code.
///
/// ## Example
/// ```rust
/// use sitebook_core::code::format_code;
/// use sitebook_core::EntityType;
///
/// assert_eq!(format_code("abc", EntityType::Expense, 6), "ABCEXP006");
/// assert_eq!(format_code("ABC", EntityType::Employee, 12), "ABCEMP0012");
/// // Wider than the pad: grows instead of truncating
/// assert_eq!(format_code("ABC", EntityType::Expense, 1000), "ABCEXP1000");
/// ```
pub fn format_code(prefix: &str, entity: EntityType, sequence: u64) -> String {
    format!(
        "{}{}{:0width$}",
        prefix.trim().to_ascii_uppercase(),
        entity.tag(),
        sequence,
        width = entity.pad_width()
    )
}

/// The sequence a collection holding `existing` rows hands out next.
#[inline]
pub const fn next_sequence(existing: u64) -> u64 {
    existing + 1
}

// =============================================================================
// BusinessCode
// =============================================================================

/// A business code split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCode {
    pub prefix: String,
    pub entity: EntityType,
    pub sequence: u64,
}

impl BusinessCode {
    pub fn new(prefix: &str, entity: EntityType, sequence: u64) -> Self {
        BusinessCode {
            prefix: prefix.trim().to_ascii_uppercase(),
            entity,
            sequence,
        }
    }

    /// Parses a code minted for the tenant with `prefix`.
    ///
    /// The prefix must be known up front: prefixes may end in digits or in
    /// letters that look like a tag, so a code can't be split without it.
    ///
    /// ## Example
    /// ```rust
    /// use sitebook_core::code::BusinessCode;
    /// use sitebook_core::EntityType;
    ///
    /// let code = BusinessCode::parse("ABCSAL042", "abc").unwrap();
    /// assert_eq!(code.entity, EntityType::SalaryPayment);
    /// assert_eq!(code.sequence, 42);
    /// ```
    pub fn parse(code: &str, prefix: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidCode {
            code: code.to_string(),
            reason: reason.to_string(),
        };

        let prefix = prefix.trim().to_ascii_uppercase();
        let rest = code
            .trim()
            .to_ascii_uppercase()
            .strip_prefix(prefix.as_str())
            .map(str::to_string)
            .ok_or_else(|| invalid("prefix mismatch"))?;

        if rest.len() < 3 || !rest.is_char_boundary(3) {
            return Err(invalid("missing entity tag"));
        }
        let (tag, digits) = rest.split_at(3);
        let entity: EntityType = tag.parse().map_err(|_| invalid("unknown entity tag"))?;

        if digits.len() < entity.pad_width() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("sequence must be zero-padded digits"));
        }
        let sequence = digits
            .parse::<u64>()
            .map_err(|_| invalid("sequence out of range"))?;

        Ok(BusinessCode {
            prefix,
            entity,
            sequence,
        })
    }
}

impl fmt::Display for BusinessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_code(&self.prefix, self.entity, self.sequence))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
