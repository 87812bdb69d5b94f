//! # Sales History Grouping
//!
//! The backend reports history as flat line-item rows. Each row repeats the
//! transaction's header fields (date, time, seller, total), so the grouping
//! here rebuilds one aggregate per transaction for display.
//!
//! ## Grouping
//! ```text
//! rows (as received)                      transactions (first-seen order)
//! ──────────────────                      ───────────────────────────────
//! V7  CAM001 x2  ──┐                      V7  2024-05-01 10:15  $23.50
//! V7  PAN001 x1  ──┼──────────────────►       ├── CAM001 x2
//! V6  ZAP001 x1  ──┼───────┐                  └── PAN001 x1
//!                  │       └──────────►   V6  2024-05-01 09:40  $45.00
//!                  │                          └── ZAP001 x1
//! ```
//!
//! Header fields come from the first row seen for an id. Rows that disagree
//! with that header are still grouped; `inconsistent_transactions` reports
//! them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::SaleRecord;

/// One line item inside a grouped transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionItem {
    pub product_id: Option<String>,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// A sale transaction rebuilt from its history rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleTransaction {
    pub id: String,
    pub date: String,
    pub time: String,
    pub total: Money,
    pub seller: String,
    /// Items in the order their rows were received.
    pub items: Vec<TransactionItem>,
}

impl SaleTransaction {
    fn from_header(row: &SaleRecord) -> Self {
        SaleTransaction {
            id: row.sale_id.clone(),
            date: row.date.clone(),
            time: row.time.clone(),
            total: row.transaction_total,
            seller: row.seller.clone(),
            items: Vec::new(),
        }
    }

    /// Sum of units across all items.
    pub fn quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Groups flat rows by transaction id.
///
/// Transactions keep the order in which their id first appeared; items keep
/// the order of their rows. Never fails, and re-grouping the flattened output
/// yields the same transactions.
pub fn group_by_transaction(rows: &[SaleRecord]) -> Vec<SaleTransaction> {
    let mut transactions: Vec<SaleTransaction> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let position = *index.entry(row.sale_id.as_str()).or_insert_with(|| {
            transactions.push(SaleTransaction::from_header(row));
            transactions.len() - 1
        });

        transactions[position].items.push(TransactionItem {
            product_id: row.product_id.clone(),
            code: row.product_code.clone(),
            name: row.product_name.clone(),
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
        });
    }

    transactions
}

/// Expands transactions back into flat rows, one per item.
pub fn flatten(transactions: &[SaleTransaction]) -> Vec<SaleRecord> {
    transactions
        .iter()
        .flat_map(|txn| {
            txn.items.iter().map(move |item| SaleRecord {
                sale_id: txn.id.clone(),
                date: txn.date.clone(),
                time: txn.time.clone(),
                product_id: item.product_id.clone(),
                product_code: item.code.clone(),
                product_name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
                seller: txn.seller.clone(),
                transaction_total: txn.total,
            })
        })
        .collect()
}

/// Ids whose rows disagree on date, time, seller or transaction total.
///
/// Reported in first-seen order, each id once.
pub fn inconsistent_transactions(rows: &[SaleRecord]) -> Vec<String> {
    let mut headers: HashMap<&str, &SaleRecord> = HashMap::new();
    let mut inconsistent: Vec<String> = Vec::new();

    for row in rows {
        let header = *headers.entry(row.sale_id.as_str()).or_insert(row);
        let agrees = header.date == row.date
            && header.time == row.time
            && header.seller == row.seller
            && header.transaction_total == row.transaction_total;

        if !agrees && !inconsistent.iter().any(|id| id == &row.sale_id) {
            inconsistent.push(row.sale_id.clone());
        }
    }

    inconsistent
}

// =============================================================================
// Unit Tests
// =============================================================================
