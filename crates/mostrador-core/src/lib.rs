//! # mostrador-core: Pure Business Logic for Mostrador POS
//!
//! This crate is the **heart** of Mostrador POS. It contains the cart engine,
//! the inventory snapshot and the sales history grouping as pure code with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mostrador POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (terminal app, web UI, ...)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        mostrador-client (Register, HttpBackend, config)         │   │
//! │  │    refresh, submit_sale, fetch_history, fetch_summary           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ mostrador-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   cart    │  │  history  │  │ validation│  │   │
//! │  │   │ Snapshot  │  │   Cart    │  │  group_by │  │   rules   │  │   │
//! │  │   │  lookup   │  │ CartLine  │  │ _txn      │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleRecord, DailySummary, alerts)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`inventory`] - Local inventory snapshot used for stock checks
//! - [`cart`] - The cart engine
//! - [`history`] - Grouping of flat sale rows into transactions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::{Cart, InventorySnapshot, Money, Product};
//!
//! let mut snapshot = InventorySnapshot::new();
//! snapshot
//!     .replace(vec![Product::new("1", "CAM001", "Camisa", Money::from_cents(1000), 5, 1)])
//!     .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(&snapshot, "1").unwrap();
//! cart.add_item(&snapshot, "1").unwrap();
//!
//! assert_eq!(cart.total(), Money::from_cents(2000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod history;
pub mod inventory;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals, StockShortfall};
pub use error::{CartError, CartResult, SnapshotError, ValidationError};
pub use history::{flatten, group_by_transaction, inconsistent_transactions, SaleTransaction, TransactionItem};
pub use inventory::InventorySnapshot;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Seller recorded on a sale when nobody is configured.
///
/// Matches the backend's own fallback for a missing `vendedor`.
pub const DEFAULT_SELLER: &str = "Sistema";

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps one sale within a single backend request
/// of reasonable size.
pub const MAX_CART_LINES: usize = 100;
