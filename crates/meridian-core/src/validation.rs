//! # Validation Module
//!
//! Input validation utilities for Meridian POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                      │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (terminal core)                                   │
//! │  ├── Checked before any cart mutation or network call                   │
//! │  └── The only layer the core trusts                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Authoritative validation (stock, payload shape)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (clears results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a tendered cash amount.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative tenders are keypad mistakes
pub fn validate_tendered_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount paid".to_string(),
        });
    }

    Ok(())
}

/// Validates a line discount against the line gross amount.
///
/// ## Rules
/// - Must be non-negative
/// - Cannot exceed the line gross (`quantity × unit_price`)
pub fn validate_discount(discount_cents: i64, gross_cents: i64) -> ValidationResult<()> {
    if discount_cents < 0 || discount_cents > gross_cents {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: gross_cents,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  AB12 ").unwrap(), "AB12");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_tendered_amount() {
        assert!(validate_tendered_amount(Money::from_cents(2500)).is_ok());
        assert!(validate_tendered_amount(Money::zero()).is_err());
        assert!(validate_tendered_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(0, 1000).is_ok());
        assert!(validate_discount(1000, 1000).is_ok());
        assert!(validate_discount(1001, 1000).is_err());
        assert!(validate_discount(-1, 1000).is_err());
    }
}
