//! # Validation Module
//!
//! Input validation utilities for Mostrador POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (CLI arguments, forms)                          │
//! │  ├── Basic parsing (numbers, CODE:QTY pairs)                           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Client / Cart (Rust)                                         │
//! │  ├── THIS MODULE: seller, codes, quantities, dates, limits             │
//! │  └── Stock rules (cart engine)                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Authoritative stock check inside the sale transaction             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::validation::{validate_product_code, validate_quantity};
//!
//! validate_product_code("CAM001").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest seller name accepted.
pub const MAX_SELLER_LEN: usize = 100;

/// Largest quantity a single line may carry.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Bounds on the number of history rows requested at once.
pub const MIN_HISTORY_LIMIT: u32 = 1;
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Date format shared with the backend.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// String Validators
// =============================================================================

/// Validates a seller name.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 100 characters once trimmed
pub fn validate_seller(seller: &str) -> ValidationResult<()> {
    let seller = seller.trim();

    if seller.is_empty() {
        return Err(ValidationError::Required {
            field: "seller".to_string(),
        });
    }

    if seller.chars().count() > MAX_SELLER_LEN {
        return Err(ValidationError::TooLong {
            field: "seller".to_string(),
            max: MAX_SELLER_LEN,
        });
    }

    Ok(())
}

/// Validates a product code (SKU).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_product_code;
///
/// assert!(validate_product_code("CAM-001").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of history rows to request (1..=1000).
pub fn validate_history_limit(limit: u32) -> ValidationResult<()> {
    if !(MIN_HISTORY_LIMIT..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "history limit".to_string(),
            min: MIN_HISTORY_LIMIT as i64,
            max: MAX_HISTORY_LIMIT as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date.
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_date;
///
/// assert!(validate_date("2024-05-01").is_ok());
/// assert!(validate_date("2024-13-01").is_err());
/// assert!(validate_date("01/05/2024").is_err());
/// ```
pub fn validate_date(date: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("expected YYYY-MM-DD ({})", e),
    })
}

/// Validates an optional inclusive date range; `from` must not be after `to`.
pub fn validate_date_range(from: Option<&str>, to: Option<&str>) -> ValidationResult<()> {
    let from = from.map(validate_date).transpose()?;
    let to = to.map(validate_date).transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::InvalidFormat {
                field: "date range".to_string(),
                reason: format!("{} is after {}", from, to),
            });
        }
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
    fn test_validate_seller() {
        assert!(validate_seller("Ana").is_ok());
        assert!(validate_seller("  Luis  ").is_ok());

        assert!(validate_seller("").is_err());
        assert!(validate_seller("   ").is_err());
        assert!(validate_seller(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("CAM001").is_ok());
        assert!(validate_product_code("PAN-002").is_ok());
        assert!(validate_product_code("zap_3").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_history_limit() {
        assert!(validate_history_limit(1).is_ok());
        assert!(validate_history_limit(50).is_ok());
        assert!(validate_history_limit(1000).is_ok());

        assert!(validate_history_limit(0).is_err());
        assert!(validate_history_limit(1001).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("yesterday").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(None, None).is_ok());
        assert!(validate_date_range(Some("2024-05-01"), None).is_ok());
        assert!(validate_date_range(Some("2024-05-01"), Some("2024-05-01")).is_ok());
        assert!(validate_date_range(Some("2024-05-02"), Some("2024-05-01")).is_err());
        assert!(validate_date_range(None, Some("bad")).is_err());
    }
}
