//! Property-based tests for cart and history invariants
//!
//! These tests verify properties that must hold for all inputs,
//! not just specific test cases.

use mostrador_core::*;
use proptest::prelude::*;

fn snapshot_of(stocks: &[(i64, i64)]) -> InventorySnapshot {
    let products = stocks
        .iter()
        .enumerate()
        .map(|(i, &(price, stock))| {
            Product::new(
                i.to_string(),
                format!("P{:03}", i),
                format!("Product {}", i),
                Money::from_cents(price),
                stock,
                1,
            )
        })
        .collect();
    let mut snapshot = InventorySnapshot::new();
    snapshot.replace(products).unwrap();
    snapshot
}

/// A cart operation drawn at random.
#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Adjust(usize, i64),
    Remove(usize),
}

fn op_strategy(products: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..products).prop_map(Op::Add),
        ((0..products), -6i64..6).prop_map(|(p, d)| Op::Adjust(p, d)),
        (0..products).prop_map(Op::Remove),
    ]
}

fn apply(cart: &mut Cart, snapshot: &InventorySnapshot, op: &Op) {
    // Rule violations are expected here; only the resulting state matters.
    let _ = match op {
        Op::Add(p) => cart.add_item(snapshot, &p.to_string()).map(|_| ()),
        Op::Adjust(p, d) => cart.adjust_quantity(snapshot, &p.to_string(), *d).map(|_| ()),
        Op::Remove(p) => {
            cart.remove_item(&p.to_string());
            Ok(())
        }
    };
}

// ============================================================================
// Cart Invariants
// ============================================================================

proptest! {
    /// Property: a product with no stock can never be added
    #[test]
    fn out_of_stock_add_always_fails(
        price in 0i64..100_000,
        ops in proptest::collection::vec(op_strategy(2), 0..20),
    ) {
        let snapshot = snapshot_of(&[(price, 0), (500, 5)]);
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, &snapshot, op);
        }

        let before = cart.clone();
        let result = cart.add_item(&snapshot, "0");
        let is_out_of_stock = matches!(result, Err(CartError::OutOfStock { .. }));
        prop_assert!(is_out_of_stock);
        prop_assert_eq!(cart, before);
    }

    /// Property: every line stays within 1..=stock whatever sequence is applied
    #[test]
    fn lines_stay_within_stock(
        stocks in proptest::collection::vec(0i64..8, 1..5),
        seed_ops in proptest::collection::vec((0usize..5, -6i64..6, 0u8..3), 0..60),
    ) {
        let snapshot = snapshot_of(&stocks.iter().map(|&s| (250, s)).collect::<Vec<_>>());
        let mut cart = Cart::new();

        for (p, d, kind) in seed_ops {
            let p = p % stocks.len();
            let op = match kind {
                0 => Op::Add(p),
                1 => Op::Adjust(p, d),
                _ => Op::Remove(p),
            };
            apply(&mut cart, &snapshot, &op);

            for line in cart.lines() {
                prop_assert!(line.quantity >= 1);
                prop_assert!(line.quantity <= snapshot.available(&line.product_id));
            }
        }
    }

    /// Property: total is always the exact sum of unit price × quantity
    #[test]
    fn total_equals_sum_of_lines(
        prices in proptest::collection::vec(0i64..1_000_000, 1..6),
        ops in proptest::collection::vec(op_strategy(6), 0..80),
    ) {
        let snapshot = snapshot_of(&prices.iter().map(|&p| (p, 10)).collect::<Vec<_>>());
        let mut cart = Cart::new();

        for op in &ops {
            // Ops may reference products beyond the generated ones; those fail
            apply(&mut cart, &snapshot, op);

            let expected: i64 = cart
                .lines()
                .iter()
                .map(|l| l.unit_price.cents() * l.quantity)
                .sum();
            prop_assert_eq!(cart.total().cents(), expected);
        }
    }
}

// ============================================================================
// History Invariants
// ============================================================================

fn record_strategy() -> impl Strategy<Value = SaleRecord> {
    (0u8..5, 0u8..10, 1i64..10, 0i64..10_000).prop_map(|(sale, item, quantity, price)| {
        SaleRecord {
            sale_id: format!("V{}", sale),
            // Header fields derive from the id so rows of one sale agree
            date: format!("2024-05-0{}", sale + 1),
            time: format!("1{}:00:00", sale),
            product_id: Some(item.to_string()),
            product_code: format!("P{:03}", item),
            product_name: format!("Product {}", item),
            quantity,
            unit_price: Money::from_cents(price),
            subtotal: Money::from_cents(price * quantity),
            seller: format!("Seller {}", sale),
            transaction_total: Money::from_cents(1000 * sale as i64),
        }
    })
}

proptest! {
    /// Property: re-grouping the flattened grouping yields the same transactions
    #[test]
    fn grouping_is_idempotent(rows in proptest::collection::vec(record_strategy(), 0..40)) {
        let once = group_by_transaction(&rows);
        let twice = group_by_transaction(&flatten(&once));
        prop_assert_eq!(once, twice);
    }

    /// Property: grouping keeps every row and keeps first-seen order of ids
    #[test]
    fn grouping_preserves_order(rows in proptest::collection::vec(record_strategy(), 0..40)) {
        let txns = group_by_transaction(&rows);

        let item_count: usize = txns.iter().map(|t| t.items.len()).sum();
        prop_assert_eq!(item_count, rows.len());

        let mut first_seen: Vec<&str> = Vec::new();
        for row in &rows {
            if !first_seen.contains(&row.sale_id.as_str()) {
                first_seen.push(&row.sale_id);
            }
        }
        let ids: Vec<&str> = txns.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids, first_seen);

        for txn in &txns {
            let codes: Vec<&str> = rows
                .iter()
                .filter(|r| r.sale_id == txn.id)
                .map(|r| r.product_code.as_str())
                .collect();
            let grouped: Vec<&str> = txn.items.iter().map(|i| i.code.as_str()).collect();
            prop_assert_eq!(grouped, codes);
        }

        prop_assert!(inconsistent_transactions(&rows).is_empty());
    }
}
