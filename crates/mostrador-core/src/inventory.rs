//! # Inventory Snapshot
//!
//! The client's local, point-in-time copy of backend inventory.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory Snapshot Lifecycle                         │
//! │                                                                         │
//! │  ┌────────────┐  replace(list)   ┌────────────┐                         │
//! │  │ Never      │ ───────────────► │  Loaded    │ ◄──┐                    │
//! │  │ loaded     │                  │ (authoritative)  │ replace(list)     │
//! │  └────────────┘                  └─────┬──────┘ ───┘                    │
//! │        │                               │                                │
//! │        │ replace(bad list)             │ decrement() after a commit     │
//! │        ▼                               ▼                                │
//! │   SnapshotError,                 ┌────────────┐                         │
//! │   nothing changes                │  Stale     │  (optimistic math only) │
//! │                                  └────────────┘                         │
//! │                                                                         │
//! │  The whole list is validated BEFORE the swap: readers see either the   │
//! │  old snapshot or the new one, never a mix.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::SnapshotError;
use crate::types::Product;

/// Products in backend order plus an id index for stock lookups.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    loaded_at: Option<DateTime<Utc>>,
    /// True once a local decrement has been applied since the last load.
    reconciled: bool,
}

impl InventorySnapshot {
    /// Creates an empty, never-loaded snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot with `products`.
    ///
    /// ## Validation
    /// - ids are unique
    /// - codes are unique
    /// - stock, minimum and price are not negative
    ///
    /// On error the current snapshot is left exactly as it was.
    pub fn replace(&mut self, products: Vec<Product>) -> Result<(), SnapshotError> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_code = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            check_not_negative(product, "quantity", product.quantity_on_hand)?;
            check_not_negative(product, "minimum stock", product.min_stock)?;
            check_not_negative(product, "price", product.unit_price.cents())?;

            if by_id.insert(product.id.clone(), position).is_some() {
                return Err(SnapshotError::DuplicateId(product.id.clone()));
            }
            if by_code.insert(product.code.clone(), position).is_some() {
                return Err(SnapshotError::DuplicateCode(product.code.clone()));
            }
        }

        self.products = products;
        self.by_id = by_id;
        self.by_code = by_code;
        self.loaded_at = Some(Utc::now());
        self.reconciled = false;
        Ok(())
    }

    /// Looks up a product by its stable id.
    pub fn lookup(&self, product_id: &str) -> Option<&Product> {
        self.by_id.get(product_id).map(|&i| &self.products[i])
    }

    /// Looks up a product by its code (SKU).
    pub fn lookup_by_code(&self, code: &str) -> Option<&Product> {
        self.by_code.get(code).map(|&i| &self.products[i])
    }

    /// Units on hand for a product; a product missing from the snapshot has none.
    pub fn available(&self, product_id: &str) -> i64 {
        self.lookup(product_id).map_or(0, |p| p.quantity_on_hand)
    }

    /// All products in the order the backend returned them.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products at or below their minimum stock, in snapshot order.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinguishes "loaded, and the store has nothing" from "never loaded".
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// True when quantities include local arithmetic not yet confirmed by a refresh.
    pub fn is_reconciled_locally(&self) -> bool {
        self.reconciled
    }

    /// Optimistically removes `quantity` sold units from a product.
    ///
    /// Saturates at zero. Returns the new quantity, or `None` when the
    /// product is not in the snapshot.
    pub fn decrement(&mut self, product_id: &str, quantity: i64) -> Option<i64> {
        let index = *self.by_id.get(product_id)?;
        let product = &mut self.products[index];
        product.quantity_on_hand = (product.quantity_on_hand - quantity).max(0);
        self.reconciled = true;
        Some(product.quantity_on_hand)
    }
}

fn check_not_negative(product: &Product, field: &'static str, value: i64) -> Result<(), SnapshotError> {
    if value < 0 {
        return Err(SnapshotError::NegativeValue {
            code: product.code.clone(),
            field,
            value,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
