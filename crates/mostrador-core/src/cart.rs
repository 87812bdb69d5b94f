//! # Cart Engine
//!
//! Owns the lines being built into a sale and enforces stock rules on every
//! mutation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  User Action          Engine Call                 Cart Change           │
//! │  ───────────          ───────────                 ───────────           │
//! │                                                                         │
//! │  Click Product ──────► add_item(snap, id) ──────► qty + 1 / new line   │
//! │                                                                         │
//! │  +/- Buttons ────────► adjust_quantity(snap, ─────► qty + delta,        │
//! │                          id, delta)               removed if <= 0       │
//! │                                                                         │
//! │  Trash Icon ─────────► remove_item(id) ─────────► line removed         │
//! │                                                                         │
//! │  Sale Committed ─────► clear() ─────────────────► no lines             │
//! │                                                                         │
//! │  Any Read ───────────► total() ─────────────────► (recomputed)         │
//! │                                                                         │
//! │  NOTE: Stock is read from the snapshot on EVERY mutation. The cart     │
//! │        never trusts a quantity checked at an earlier point.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::inventory::InventorySnapshot;
use crate::money::Money;
use crate::types::{OrderLine, Product, SaleOrder};
use crate::validation::validate_seller;
use crate::{DEFAULT_SELLER, MAX_CART_LINES};

/// A line in the cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the product in the snapshot (stock checks)
/// - `code`, `name`, `unit_price`: Frozen copy of the product at time of
///   adding, so the cart renders the same even if a refresh changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,

    /// Code at time of adding (frozen). Sent to the backend.
    pub code: String,

    /// Name at time of adding (frozen)
    pub name: String,

    /// Price at time of adding (frozen)
    pub unit_price: Money,

    /// Always >= 1
    pub quantity: i64,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A cart line that asks for more than the snapshot now holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockShortfall {
    pub product_id: String,
    pub code: String,
    pub requested: i64,
    pub available: i64,
}

/// The cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increments)
/// - Every line has quantity >= 1 and <= stock at its last validation
/// - `total()` is recomputed from the lines on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    seller: String,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart with the default seller.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            seller: DEFAULT_SELLER.to_string(),
        }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product has zero stock: `OutOfStock`
    /// - Already in cart: +1, or `InsufficientStock` if that exceeds stock
    /// - Not in cart: new line with quantity 1
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, snapshot: &InventorySnapshot, product_id: &str) -> CartResult<i64> {
        let product = snapshot
            .lookup(product_id)
            .ok_or_else(|| CartError::ProductNotFound(product_id.to_string()))?;

        if product.quantity_on_hand == 0 {
            return Err(CartError::OutOfStock {
                product_id: product.id.clone(),
                code: product.code.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            let requested = line.quantity + 1;
            if !product.can_supply(requested) {
                return Err(insufficient(product, requested));
            }
            line.quantity = requested;
            return Ok(requested);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CartError::CartTooLarge { max: MAX_CART_LINES });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(1)
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// ## Behavior
    /// - No such line: `LineNotFound`
    /// - New quantity <= 0: line removed, returns `Ok(None)`
    /// - New quantity above current stock: `InsufficientStock`, cart unchanged
    /// - Otherwise: returns `Ok(Some(new_quantity))`
    ///
    /// A product that disappeared from the snapshot counts as zero stock.
    pub fn adjust_quantity(
        &mut self,
        snapshot: &InventorySnapshot,
        product_id: &str,
        delta: i64,
    ) -> CartResult<Option<i64>> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or_else(|| CartError::LineNotFound(product_id.to_string()))?;

        let new_quantity = self.lines[index].quantity.saturating_add(delta);
        if new_quantity <= 0 {
            self.lines.remove(index);
            return Ok(None);
        }

        let available = snapshot.available(product_id);
        if new_quantity > available {
            return Err(CartError::InsufficientStock {
                product_id: product_id.to_string(),
                code: self.lines[index].code.clone(),
                available,
                requested: new_quantity,
            });
        }

        self.lines[index].quantity = new_quantity;
        Ok(Some(new_quantity))
    }

    /// Removes a line. Idempotent: returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    /// Sum of unit price × quantity over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Empties all lines. Only used after a confirmed sale.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines whose quantity now exceeds the snapshot's stock.
    ///
    /// Run after a refresh to find what must be adjusted before a retry.
    pub fn revalidate(&self, snapshot: &InventorySnapshot) -> Vec<StockShortfall> {
        self.lines
            .iter()
            .filter_map(|line| {
                let available = snapshot.available(&line.product_id);
                (line.quantity > available).then(|| StockShortfall {
                    product_id: line.product_id.clone(),
                    code: line.code.clone(),
                    requested: line.quantity,
                    available,
                })
            })
            .collect()
    }

    /// Builds the backend request: lines keyed by code, plus the seller.
    pub fn order(&self) -> CartResult<SaleOrder> {
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        Ok(SaleOrder {
            lines: self
                .lines
                .iter()
                .map(|l| OrderLine {
                    code: l.code.clone(),
                    quantity: l.quantity,
                })
                .collect(),
            seller: self.seller.clone(),
        })
    }

    pub fn set_seller(&mut self, seller: &str) -> CartResult<()> {
        validate_seller(seller)?;
        self.seller = seller.trim().to_string();
        Ok(())
    }

    pub fn seller(&self) -> &str {
        &self.seller
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn insufficient(product: &Product, requested: i64) -> CartError {
    CartError::InsufficientStock {
        product_id: product.id.clone(),
        code: product.code.clone(),
        available: product.quantity_on_hand,
        requested,
    }
}

/// Cart totals summary for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}
