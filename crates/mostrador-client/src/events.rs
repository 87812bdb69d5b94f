//! # Register Events
//!
//! Presentation layers subscribe to register changes instead of holding
//! their own copies of the cart or the inventory.
//!
//! ## Sale Submission States
//! ```text
//!                ┌────────────┐
//!       ┌───────►│    Idle    │◄──────────────────────────┐
//!       │        └─────┬──────┘                           │
//!       │              │ submit_sale() with a non-empty   │
//!       │              ▼ cart                             │
//!       │        ┌────────────┐                           │
//!       │        │ Submitting │  (bounded by sale_timeout)│
//!       │        └─────┬──────┘                           │
//!       │     ┌────────┼─────────────┐                    │
//!       │     ▼        ▼             ▼                    │
//!  ┌────┴──────┐ ┌──────────┐  ┌──────────┐               │
//!  │ Committed │ │ Rejected │  │  Failed  │───────────────┘
//!  │ cart empty│ │cart kept │  │cart kept │
//!  └───────────┘ └────┬─────┘  └──────────┘
//!                     └──────────────────────────────────►(Idle)
//! ```

use mostrador_core::CartTotals;
use serde::Serialize;

/// Where a sale submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleState {
    #[default]
    Idle,
    Submitting,
    /// Backend recorded the sale.
    Committed,
    /// Backend refused it for a business reason.
    Rejected,
    /// Transport or parse failure; outcome unknown to the client.
    Failed,
}

impl std::fmt::Display for SaleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleState::Idle => write!(f, "idle"),
            SaleState::Submitting => write!(f, "submitting"),
            SaleState::Committed => write!(f, "committed"),
            SaleState::Rejected => write!(f, "rejected"),
            SaleState::Failed => write!(f, "failed"),
        }
    }
}

/// Trait for emitting register events (implemented by the presentation layer).
pub trait RegisterEventEmitter: Send + Sync {
    /// Emits a sale submission state change.
    fn emit_sale_state(&self, state: SaleState);

    /// Emits after a new inventory snapshot is in place.
    fn emit_inventory(&self, product_count: usize, low_stock_count: usize);

    /// Emits after any cart mutation.
    fn emit_cart(&self, totals: &CartTotals);

    /// Emits a user-facing error.
    fn emit_error(&self, message: &str, retryable: bool);
}

/// No-op event emitter.
pub struct NoOpEmitter;

impl RegisterEventEmitter for NoOpEmitter {
    fn emit_sale_state(&self, _state: SaleState) {}
    fn emit_inventory(&self, _product_count: usize, _low_stock_count: usize) {}
    fn emit_cart(&self, _totals: &CartTotals) {}
    fn emit_error(&self, _message: &str, _retryable: bool) {}
}
