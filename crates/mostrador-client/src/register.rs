//! # Register Session
//!
//! One register owns one cart and one inventory snapshot and is the only
//! thing that mutates them. It drives the sale submission protocol.
//!
//! ## Sale Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_sale()                                        │
//! │                                                                         │
//! │  cart.order() ──── EmptyCart? ──────────────► Err(Cart(EmptyCart))     │
//! │       │                                       (backend not contacted)   │
//! │       ▼                                                                 │
//! │  Submitting ── backend.submit_sale(order) within sale_timeout           │
//! │       │                                                                 │
//! │       ├── Ok(confirmation)                                              │
//! │       │     ├── snapshot.decrement(line) for every line                 │
//! │       │     ├── cart.clear()                                            │
//! │       │     ├── Committed → SaleReceipt (alerts verbatim)               │
//! │       │     └── refresh() if refresh_after_sale (failure only logged)   │
//! │       │                                                                 │
//! │       ├── Rejected(reason) ──► SaleRejected   (cart + snapshot intact)  │
//! │       │                                                                 │
//! │       └── anything else ────► SaleTransportFailure (cart + snapshot     │
//! │                                                      intact)            │
//! │                                                                         │
//! │  The register then returns to Idle. Nothing is retried automatically.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `submit_sale` takes `&mut self`, so a second submission of the same cart
//! cannot start while one is in flight.

use std::sync::Arc;
use std::time::Duration;

use mostrador_core::validation::{validate_date, validate_product_code, validate_quantity};
use mostrador_core::{
    group_by_transaction, Cart, CartError, CartTotals, DailySummary, InventorySnapshot, Product,
    SaleReceipt, SaleRecord, SaleTransaction, StockAlert, StockShortfall,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::backend::{Backend, HistoryQuery};
use crate::config::ClientConfig;
use crate::error::{BackendError, ClientError, ClientResult};
use crate::events::{NoOpEmitter, RegisterEventEmitter, SaleState};

/// A point-of-sale register bound to one backend.
pub struct Register<B: Backend> {
    backend: B,
    snapshot: InventorySnapshot,
    cart: Cart,
    sale_timeout: Duration,
    history_limit: u32,
    refresh_after_sale: bool,
    last_refresh_error: Option<String>,
    emitter: Arc<dyn RegisterEventEmitter>,
}

impl<B: Backend> Register<B> {
    /// Creates a register with an empty, never-loaded snapshot.
    pub fn new(backend: B, config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut cart = Cart::new();
        cart.set_seller(config.seller())?;

        Ok(Register {
            backend,
            snapshot: InventorySnapshot::new(),
            cart,
            sale_timeout: config.sale_timeout(),
            history_limit: config.register.history_limit,
            refresh_after_sale: config.register.refresh_after_sale,
            last_refresh_error: None,
            emitter: Arc::new(NoOpEmitter),
        })
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn RegisterEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Replaces the snapshot with the backend's current inventory.
    ///
    /// On failure the previous snapshot stays in place (possibly never
    /// loaded) and the error is kept in `last_refresh_error`.
    pub async fn refresh(&mut self) -> ClientResult<usize> {
        match self.load_snapshot().await {
            Ok(count) => {
                self.last_refresh_error = None;
                let low_stock = self.snapshot.low_stock().len();
                info!(products = count, low_stock, "Inventory snapshot loaded");
                self.emitter.emit_inventory(count, low_stock);
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, loaded = self.snapshot.is_loaded(), "Inventory refresh failed");
                let message = err.to_string();
                self.emitter.emit_error(&message, true);
                self.last_refresh_error = Some(message);
                Err(err)
            }
        }
    }

    async fn load_snapshot(&mut self) -> ClientResult<usize> {
        let products = self
            .backend
            .fetch_inventory()
            .await
            .map_err(|e| ClientError::SnapshotLoadFailure(e.to_string()))?;
        self.snapshot.replace(products)?;
        Ok(self.snapshot.len())
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    /// Products at or below their minimum in the current snapshot.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.snapshot.low_stock()
    }

    pub fn last_refresh_error(&self) -> Option<&str> {
        self.last_refresh_error.as_deref()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn add_item(&mut self, product_id: &str) -> ClientResult<i64> {
        let quantity = self.cart.add_item(&self.snapshot, product_id)?;
        self.cart_changed();
        Ok(quantity)
    }

    /// Adds `quantity` units of the product with `code`, all or nothing.
    pub fn add_by_code(&mut self, code: &str, quantity: i64) -> ClientResult<i64> {
        validate_quantity(quantity)?;
        let product_id = self
            .snapshot
            .lookup_by_code(code)
            .map(|p| p.id.clone())
            .ok_or_else(|| CartError::ProductNotFound(code.to_string()))?;

        let before = self.cart.clone();
        let outcome = self.cart.add_item(&self.snapshot, &product_id).and_then(|added| {
            if quantity > 1 {
                self.cart
                    .adjust_quantity(&self.snapshot, &product_id, quantity - 1)
                    .map(|q| q.unwrap_or(added))
            } else {
                Ok(added)
            }
        });

        match outcome {
            Ok(total) => {
                self.cart_changed();
                Ok(total)
            }
            Err(err) => {
                self.cart = before;
                Err(err.into())
            }
        }
    }

    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> ClientResult<Option<i64>> {
        let quantity = self.cart.adjust_quantity(&self.snapshot, product_id, delta)?;
        self.cart_changed();
        Ok(quantity)
    }

    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let removed = self.cart.remove_item(product_id);
        if removed {
            self.cart_changed();
        }
        removed
    }

    pub fn set_seller(&mut self, seller: &str) -> ClientResult<()> {
        self.cart.set_seller(seller)?;
        Ok(())
    }

    /// Cart lines the current snapshot can no longer supply.
    pub fn shortfalls(&self) -> Vec<StockShortfall> {
        self.cart.revalidate(&self.snapshot)
    }

    fn cart_changed(&self) {
        self.emitter.emit_cart(&CartTotals::from(&self.cart));
    }

    // =========================================================================
    // Sale Submission
    // =========================================================================

    /// Submits the cart as one sale.
    ///
    /// ## Outcomes
    /// - Empty cart: `Cart(EmptyCart)`, backend not contacted
    /// - Committed: snapshot decremented, cart cleared, receipt returned
    /// - `SaleRejected`: cart and snapshot untouched, refresh before retrying
    /// - `SaleTransportFailure`: cart and snapshot untouched, safe to retry
    pub async fn submit_sale(&mut self) -> ClientResult<SaleReceipt> {
        let order = self.cart.order()?;
        let submission = Uuid::new_v4();

        info!(
            %submission,
            seller = %order.seller,
            lines = order.lines.len(),
            total = %self.cart.total(),
            "Submitting sale"
        );
        self.emitter.emit_sale_state(SaleState::Submitting);

        let outcome = match tokio::time::timeout(self.sale_timeout, self.backend.submit_sale(&order)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.sale_timeout)),
        };

        let confirmation = match outcome {
            Ok(confirmation) => confirmation,
            Err(BackendError::Rejected(reason)) => {
                warn!(%submission, %reason, "Sale rejected by backend");
                self.emitter.emit_error(&reason, false);
                self.settle(SaleState::Rejected);
                return Err(ClientError::SaleRejected { reason });
            }
            Err(err) => {
                error!(%submission, error = %err, "Sale submission failed");
                self.emitter.emit_error(&err.to_string(), true);
                self.settle(SaleState::Failed);
                return Err(ClientError::SaleTransportFailure(err));
            }
        };

        for line in self.cart.lines() {
            if self.snapshot.decrement(&line.product_id, line.quantity).is_none() {
                debug!(product_id = %line.product_id, "Sold product no longer in snapshot");
            }
        }

        let receipt = SaleReceipt::new(
            confirmation,
            self.cart.seller().to_string(),
            self.cart.lines().to_vec(),
        );
        self.cart.clear();

        info!(
            %submission,
            sale_id = %receipt.sale_id,
            total = %receipt.total,
            items = receipt.item_count,
            "Sale committed"
        );
        for alert in &receipt.alerts {
            warn!(product = %alert.product, remaining = alert.remaining_quantity, "Low stock after sale");
        }

        self.emitter.emit_sale_state(SaleState::Committed);
        self.cart_changed();

        if self.refresh_after_sale {
            if let Err(err) = self.refresh().await {
                warn!(%submission, error = %err, "Keeping locally reconciled stock");
            }
        }

        self.emitter.emit_sale_state(SaleState::Idle);
        Ok(receipt)
    }

    fn settle(&self, state: SaleState) {
        self.emitter.emit_sale_state(state);
        self.emitter.emit_sale_state(SaleState::Idle);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Flat history rows; the configured limit applies when none is given.
    pub async fn history(&self, query: Option<HistoryQuery>) -> ClientResult<Vec<SaleRecord>> {
        let mut query = query.unwrap_or_default();
        if query.limit.is_none() {
            query.limit = Some(self.history_limit);
        }
        query.validate()?;

        Ok(self.backend.fetch_history(&query).await?)
    }

    /// History grouped into transactions, first-seen order.
    pub async fn transactions(&self, query: Option<HistoryQuery>) -> ClientResult<Vec<SaleTransaction>> {
        let rows = self.history(query).await?;
        Ok(group_by_transaction(&rows))
    }

    /// Daily summary for `date` (`YYYY-MM-DD`), or today on the backend.
    pub async fn summary(&self, date: Option<&str>) -> ClientResult<DailySummary> {
        if let Some(date) = date {
            validate_date(date)?;
        }
        Ok(self.backend.fetch_summary(date).await?)
    }

    /// Asks the backend for one product, bypassing the snapshot.
    pub async fn lookup_remote(&self, code: &str) -> ClientResult<Option<Product>> {
        validate_product_code(code)?;
        Ok(self.backend.fetch_product(code.trim()).await?)
    }

    /// The backend's own low-stock list.
    pub async fn alerts(&self) -> ClientResult<Vec<StockAlert>> {
        Ok(self.backend.fetch_low_stock_alerts().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
