//! # Currency Codes
//!
//! ISO 4217 currency codes and the one place the "missing currency means
//! USD" rule lives.
//!
//! ## Where Normalization Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DB row (currency NULL / "" / "eur")                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CurrencyCode::normalize()  ← ONCE, when the record is loaded           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MonetaryRecord { currency: "USD" / "EUR" }                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Aggregator: groups by currency, never sees a missing value            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

/// Currency used when a record carries none.
pub const DEFAULT_CURRENCY: &str = "USD";

/// An upper-cased ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, type = "string")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalizes a stored currency value.
    ///
    /// `None`, empty and whitespace-only values become `USD`; anything else
    /// is trimmed and upper-cased. Used for stored rows; user input goes
    /// through [`CurrencyCode::parse`].
    ///
    /// ## Example
    /// ```rust
    /// use sitebook_core::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::normalize(None).as_str(), "USD");
    /// assert_eq!(CurrencyCode::normalize(Some(" eur ")).as_str(), "EUR");
    /// ```
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(code) if !code.is_empty() => CurrencyCode(code.to_ascii_uppercase()),
            _ => Self::usd(),
        }
    }

    /// Parses user input strictly: exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(ValidationError::required("currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "must be a 3-letter ISO 4217 code",
            ));
        }
        Ok(CurrencyCode(code.to_ascii_uppercase()))
    }

    /// The default currency.
    pub fn usd() -> Self {
        CurrencyCode(DEFAULT_CURRENCY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_currency_defaults_to_usd() {
        assert_eq!(CurrencyCode::normalize(None), CurrencyCode::usd());
        assert_eq!(CurrencyCode::normalize(Some("")), CurrencyCode::usd());
        assert_eq!(CurrencyCode::normalize(Some("   ")), CurrencyCode::usd());
    }

    #[test]
    fn test_normalize_uppercases() {
        assert_eq!(CurrencyCode::normalize(Some("jpy")).as_str(), "JPY");
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(CurrencyCode::parse("eur").unwrap().as_str(), "EUR");
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("EURO").is_err());
        assert!(CurrencyCode::parse("U$D").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&CurrencyCode::usd()).unwrap();
        assert_eq!(json, "\"USD\"");
    }

    #[test]
    fn test_typescript_binding_is_plain_string() {
        assert_eq!(<CurrencyCode as TS>::inline(), "string");
    }
}
