//! # Client Error Types
//!
//! Error types for backend access and the register session.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local (input)  │  │  Sale outcome   │  │  Reads                  │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Cart(..)       │  │  SaleRejected   │  │  SnapshotLoadFailure    │ │
//! │  │  Validation(..) │  │                 │  │                         │ │
//! │  │  (EmptyCart,    │  │  (refresh, then │  │  Backend(..)            │ │
//! │  │   OutOfStock..) │  │   retry)        │  │                         │ │
//! │  │                 │  │  SaleTransport- │  │                         │ │
//! │  │                 │  │  Failure (retry)│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Setup          │   BackendError is the transport-level error the   │
//! │  │  Config(..)     │   Backend trait returns; the Register maps it     │
//! │  │  InvalidUrl     │   into the variant matching the operation.        │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use mostrador_core::{CartError, SnapshotError, ValidationError};
use thiserror::Error;

/// Result type alias for register operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for raw backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

// =============================================================================
// Backend Error
// =============================================================================

/// What went wrong talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, reset, DNS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response within the configured time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success status without a usable business error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The backend answered `success: false`.
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Malformed(err.to_string())
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Register-level error surfaced to the presentation layer.
///
/// ## Recovery
/// - `Cart`: fix the cart and try again
/// - `SaleRejected`: refresh the inventory first, the local stock was stale
/// - `SaleTransportFailure`: safe to retry as is
/// - `SnapshotLoadFailure`: previous snapshot is still in use
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Bad query input (history limit, dates, product code).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend refused the sale for a business reason.
    #[error("Sale rejected: {reason}")]
    SaleRejected { reason: String },

    /// The sale outcome is unknown: transport, timeout or unreadable reply.
    #[error("Sale could not be completed: {0}")]
    SaleTransportFailure(#[source] BackendError),

    /// Inventory could not be fetched or was not a valid product list.
    #[error("Inventory load failed: {0}")]
    SnapshotLoadFailure(String),

    /// A read endpoint (history, summary, alerts, product) failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// True when repeating the same call unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::SaleTransportFailure(_))
    }

    /// True when the inventory must be refreshed before retrying.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, ClientError::SaleRejected { .. })
    }
}

impl From<SnapshotError> for ClientError {
    fn from(err: SnapshotError) -> Self {
        ClientError::SnapshotLoadFailure(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
