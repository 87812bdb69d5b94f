//! # Domain Types
//!
//! Core domain types used throughout Mostrador POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   SaleRecord    │   │  DailySummary   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  sale_id        │   │  date           │       │
//! │  │  code (SKU)     │   │  date, time     │   │  total_amount   │       │
//! │  │  name           │   │  product_code   │   │  sale_count     │       │
//! │  │  unit_price     │   │  quantity       │   │  items_sold     │       │
//! │  │  quantity_on_.. │   │  subtotal       │   │  sales: [..]    │       │
//! │  │  min_stock      │   │  seller, total  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleOrder     │   │  SaleReceipt    │   │ LowStockAlert   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  lines by code  │   │  sale_id, total │   │  product        │       │
//! │  │  seller         │   │  alerts         │   │  remaining_qty  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every product has:
//! - `id`: stable backend identifier, used by the cart and the snapshot
//! - `code`: human-readable SKU, used on the wire when submitting a sale

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::history::{group_by_transaction, SaleTransaction};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product as known by the local inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stable backend identifier.
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub code: String,

    /// Display name shown to the seller.
    pub name: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Units on hand as of the last refresh (or local reconciliation).
    pub quantity_on_hand: i64,

    /// At or below this quantity the product is low on stock.
    pub min_stock: i64,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity_on_hand: i64,
        min_stock: i64,
    ) -> Self {
        Product {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            unit_price,
            quantity_on_hand,
            min_stock,
        }
    }

    /// Checks if the snapshot believes `quantity` units can be sold.
    #[inline]
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.quantity_on_hand
    }

    /// The one low-stock predicate used everywhere on the client.
    ///
    /// Mirrors the backend rule: remaining quantity at or below the minimum.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity_on_hand <= self.min_stock
    }
}

// =============================================================================
// Alerts
// =============================================================================

/// Post-sale alert reported by the backend for a line that dropped to or
/// below its minimum. Passed to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LowStockAlert {
    /// Product name as reported by the backend.
    pub product: String,
    pub remaining_quantity: i64,
}

/// Entry of the backend's standing low-stock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAlert {
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub minimum: i64,
}

// =============================================================================
// Sale Order & Receipt
// =============================================================================

/// One line of a sale as sent to the backend: keyed by product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub code: String,
    pub quantity: i64,
}

/// A validated cart converted into a single atomic sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleOrder {
    pub lines: Vec<OrderLine>,
    pub seller: String,
}

/// What the backend reports when it commits a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleConfirmation {
    pub sale_id: String,
    pub total: Money,
    /// Number of distinct lines the backend processed.
    pub item_count: i64,
    pub alerts: Vec<LowStockAlert>,
}

/// Everything the caller must show the user after a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleReceipt {
    pub sale_id: String,
    /// Total as computed by the backend.
    pub total: Money,
    pub item_count: i64,
    pub alerts: Vec<LowStockAlert>,
    pub seller: String,
    /// Cart lines as they were at submission time.
    pub lines: Vec<CartLine>,
}

impl SaleReceipt {
    /// Builds the receipt from the backend confirmation and the submitted lines.
    pub fn new(confirmation: SaleConfirmation, seller: String, lines: Vec<CartLine>) -> Self {
        SaleReceipt {
            sale_id: confirmation.sale_id,
            total: confirmation.total,
            item_count: confirmation.item_count,
            alerts: confirmation.alerts,
            seller,
            lines,
        }
    }
}

// =============================================================================
// Sales History
// =============================================================================

/// A flat historical line-item row. Several rows share one `sale_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    pub sale_id: String,
    /// `YYYY-MM-DD`, verbatim from the backend.
    pub date: String,
    /// `HH:MM:SS`, verbatim from the backend.
    pub time: String,
    pub product_id: Option<String>,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub seller: String,
    pub transaction_total: Money,
}

/// Pre-aggregated figures for one day, computed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySummary {
    pub date: String,
    pub total_amount: Money,
    /// Distinct sale transactions on this date.
    pub total_sale_count: i64,
    /// Units sold across all rows.
    pub items_sold_count: i64,
    pub sales: Vec<SaleRecord>,
}

impl DailySummary {
    /// Groups this day's rows into transactions, first-seen order.
    pub fn transactions(&self) -> Vec<SaleTransaction> {
        group_by_transaction(&self.sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut product = Product::new("1", "CAM001", "Camisa", Money::from_cents(1000), 3, 2);
        assert!(!product.is_low_stock());

        product.quantity_on_hand = 2;
        assert!(product.is_low_stock());

        product.quantity_on_hand = 0;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_can_supply() {
        let product = Product::new("1", "CAM001", "Camisa", Money::from_cents(1000), 3, 0);
        assert!(product.can_supply(3));
        assert!(!product.can_supply(4));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::new("1", "CAM001", "Camisa", Money::from_cents(1000), 3, 1);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["quantityOnHand"], 3);
        assert_eq!(json["unitPrice"], 1000);
    }
}
