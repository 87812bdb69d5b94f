//! # mostrador-client: Backend Client & Register for Mostrador POS
//!
//! This crate connects the pure cart engine in `mostrador-core` to the
//! inventory backend over HTTP.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     Register<B: Backend>                         │  │
//! │  │                                                                  │  │
//! │  │  Owns the Cart and the InventorySnapshot                        │  │
//! │  │  refresh() • add_item() • submit_sale() • history() • summary()  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  HttpBackend   │  │  ClientConfig  │  │  RegisterEventEmitter  │    │
//! │  │                │  │                │  │                        │    │
//! │  │ reqwest + JSON │  │ TOML + env     │  │ sale state, cart and   │    │
//! │  │ wire DTOs      │  │ overrides      │  │ inventory changes      │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`backend`] - `Backend` trait and history filters
//! - [`config`] - Client configuration (backend URL, timeouts, seller)
//! - [`error`] - Client and backend error types
//! - [`events`] - Sale states and the event emitter trait
//! - [`http`] - `reqwest` implementation of `Backend`
//! - [`register`] - The register session
//! - [`wire`] - Backend JSON shapes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mostrador_client::{ClientConfig, HttpBackend, Register};
//!
//! # async fn run() -> mostrador_client::ClientResult<()> {
//! let config = ClientConfig::load_or_default(None);
//! let backend = HttpBackend::from_config(&config)?;
//! let mut register = Register::new(backend, &config)?;
//!
//! register.refresh().await?;
//! register.add_by_code("CAM001", 2)?;
//! let receipt = register.submit_sale().await?;
//! println!("Sale {} for {}", receipt.sale_id, receipt.total);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod register;
pub mod wire;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{Backend, HistoryQuery};
pub use config::{BackendSettings, ClientConfig, RegisterSettings};
pub use error::{BackendError, BackendResult, ClientError, ClientResult};
pub use events::{NoOpEmitter, RegisterEventEmitter, SaleState};
pub use http::HttpBackend;
pub use register::Register;
