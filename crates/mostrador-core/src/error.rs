//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CartError        - Cart engine rule violations (local, recoverable)│
//! │  ├── SnapshotError    - Inventory list rejected by the snapshot        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mostrador-client errors (separate crate)                              │
//! │  └── ClientError      - SaleRejected, SaleTransportFailure,            │
//! │                         SnapshotLoadFailure, ...                       │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → ClientError → Presentation        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every cart error leaves the cart exactly as it was before the call.

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart engine errors.
///
/// All of these are local and recoverable: the user fixes them by changing
/// the cart, never by talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no stock at all.
    #[error("Product {code} is out of stock")]
    OutOfStock { product_id: String, code: String },

    /// The requested quantity exceeds what the snapshot says is on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart has CAM001 x2, snapshot says 2 on hand
    ///      │
    ///      ▼
    /// add_item(CAM001)  → requested 3
    ///      │
    ///      ▼
    /// InsufficientStock { code: "CAM001", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Only 2 CAM001 in stock"
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        code: String,
        available: i64,
        requested: i64,
    },

    /// No line for this product exists in the cart.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// The product id is not present in the inventory snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A sale was requested for a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Snapshot Error
// =============================================================================

/// Reasons a product list is refused by the inventory snapshot.
///
/// A refused list never replaces the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Duplicate product id '{0}' in inventory")]
    DuplicateId(String),

    #[error("Duplicate product code '{0}' in inventory")]
    DuplicateCode(String),

    /// Stock, threshold or price below zero.
    #[error("Product {code} has negative {field}: {value}")]
    NegativeValue {
        code: String,
        field: &'static str,
        value: i64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Invalid format (e.g., bad decimal, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::InsufficientStock {
            product_id: "7".to_string(),
            code: "CAM001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for CAM001: available 3, requested 5"
        );

        assert_eq!(CartError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "seller".to_string(),
        };
        assert_eq!(err.to_string(), "seller is required");
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let validation_err = ValidationError::Required {
            field: "seller".to_string(),
        };
        let cart_err: CartError = validation_err.into();
        assert!(matches!(cart_err, CartError::Validation(_)));
    }
}
