//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Terminal                           │
//! │                                                                         │
//! │  Command (sell, history, ...)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ClientError ───── From ────► AppError { code, message }               │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │  main(): prints "error[SALE_REJECTED]: ..." and exits with             │
//! │          code.exit_code()                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use mostrador_client::ClientError;
use mostrador_core::CartError;
use serde::Serialize;

/// Error returned from CLI commands.
///
/// With `--json` this is what gets printed:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for CAM001: available 2, requested 3"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes, one exit status each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or record not found
    NotFound,

    /// Bad argument (quantity, date, limit)
    ValidationError,

    /// Cart rule violated locally
    CartError,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Backend refused the sale
    SaleRejected,

    /// Backend unreachable, timed out, or replied garbage
    BackendUnavailable,

    /// Config file or URL problem
    Config,

    /// Unexpected failure (output encoding)
    Internal,
}

impl ErrorCode {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::NotFound => 3,
            ErrorCode::ValidationError => 2,
            ErrorCode::CartError | ErrorCode::InsufficientStock => 4,
            ErrorCode::SaleRejected => 5,
            ErrorCode::BackendUnavailable => 6,
            ErrorCode::Config => 7,
            ErrorCode::Internal => 1,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::SaleRejected => "SALE_REJECTED",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("failed to encode output: {}", err))
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound(code) => AppError::not_found("Product", &code),
            CartError::OutOfStock { .. } | CartError::InsufficientStock { .. } => {
                AppError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CartError::Validation(e) => AppError::validation(e.to_string()),
            other => AppError::new(ErrorCode::CartError, other.to_string()),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Cart(e) => e.into(),
            ClientError::Validation(e) => AppError::validation(e.to_string()),
            ClientError::SaleRejected { reason } => AppError::new(
                ErrorCode::SaleRejected,
                format!("{} (inventory refreshed, review the cart before retrying)", reason),
            ),
            ClientError::SaleTransportFailure(e) => AppError::new(
                ErrorCode::BackendUnavailable,
                format!("sale not confirmed: {} (safe to retry)", e),
            ),
            ClientError::SnapshotLoadFailure(e) => {
                AppError::new(ErrorCode::BackendUnavailable, format!("inventory unavailable: {}", e))
            }
            ClientError::Backend(e) => AppError::new(ErrorCode::BackendUnavailable, e.to_string()),
            ClientError::Config(e) | ClientError::InvalidUrl(e) => AppError::new(ErrorCode::Config, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_client::BackendError;

    #[test]
    fn test_cart_errors_map_to_codes() {
        let err: AppError = ClientError::Cart(CartError::InsufficientStock {
            product_id: "1".to_string(),
            code: "CAM001".to_string(),
            available: 2,
            requested: 3,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.exit_code(), 4);

        let err: AppError = CartError::ProductNotFound("ZZZ".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: ZZZ");

        let err: AppError = CartError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_sale_outcomes_are_distinct() {
        let rejected: AppError = ClientError::SaleRejected {
            reason: "Stock insuficiente".to_string(),
        }
        .into();
        let failed: AppError =
            ClientError::SaleTransportFailure(BackendError::Transport("reset".to_string())).into();

        assert_eq!(rejected.code, ErrorCode::SaleRejected);
        assert_eq!(failed.code, ErrorCode::BackendUnavailable);
        assert_ne!(rejected.exit_code(), failed.exit_code());
    }

    #[test]
    fn test_display_and_json() {
        let err = AppError::validation("quantity must be positive");
        assert_eq!(err.to_string(), "error[VALIDATION_ERROR]: quantity must be positive");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}
