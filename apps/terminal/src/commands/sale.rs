//! `sell` subcommand.
//!
//! ## Flow
//! ```text
//! refresh ──► set seller ──► add_by_code × N ──► print cart ──► submit_sale
//!                                                                  │
//!                     ┌────────────────────────────────────────────┼──────────────────┐
//!                     ▼                                            ▼                  ▼
//!                 Committed                                  SaleRejected     SaleTransportFailure
//!              print receipt +                         refresh, print lines    cart kept, safe to
//!              low-stock alerts                        stock can't cover       run again
//! ```

use mostrador_client::{Backend, ClientError, Register};
use mostrador_core::{Cart, SaleReceipt, StockShortfall};
use tracing::{debug, warn};

use super::{column, Output};
use crate::cli::SellArgs;
use crate::error::AppError;

pub async fn run<B: Backend>(register: &mut Register<B>, args: SellArgs, out: Output) -> Result<(), AppError> {
    register.refresh().await?;

    if let Some(seller) = &args.seller {
        register.set_seller(seller)?;
    }

    for item in &args.items {
        let quantity = register.add_by_code(&item.code, item.quantity)?;
        debug!(code = %item.code, quantity, "Item added");
    }

    if !out.json {
        println!("{}\n", render_cart(register.cart()));
    }

    match register.submit_sale().await {
        Ok(receipt) => out.emit(&receipt, render_receipt),
        Err(err @ ClientError::SaleRejected { .. }) => {
            if let Err(refresh_err) = register.refresh().await {
                warn!(error = %refresh_err, "Could not refresh inventory after rejection");
            }
            let shortfalls = register.shortfalls();
            if !shortfalls.is_empty() && !out.json {
                eprintln!("{}", render_shortfalls(&shortfalls));
            }
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn render_cart(cart: &Cart) -> String {
    let mut lines: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "{} {} {:>4} x {:>10} = {:>10}",
                column(&line.code, 12),
                column(&line.name, 24),
                line.quantity,
                line.unit_price.to_string(),
                line.line_total().to_string()
            )
        })
        .collect();

    lines.push(format!("Seller: {}", cart.seller()));
    lines.push(format!("Total:  {}", cart.total()));
    lines.join("\n")
}

pub fn render_receipt(receipt: &SaleReceipt) -> String {
    let mut lines = vec![
        format!("Sale {} committed", receipt.sale_id),
        format!("Seller: {}", receipt.seller),
        format!("Items:  {}", receipt.item_count),
        format!("Total:  {}", receipt.total),
    ];

    if !receipt.alerts.is_empty() {
        lines.push(String::new());
        lines.push("Low stock:".to_string());
        for alert in &receipt.alerts {
            lines.push(format!("  {}: {} remaining", alert.product, alert.remaining_quantity));
        }
    }
    lines.join("\n")
}

pub fn render_shortfalls(shortfalls: &[StockShortfall]) -> String {
    let mut lines = vec!["Current stock cannot cover:".to_string()];
    for s in shortfalls {
        lines.push(format!("  {}: requested {}, available {}", s.code, s.requested, s.available));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SaleItem;
    use crate::commands::testing::{catalog, register, FakeBackend};
    use crate::error::ErrorCode;
    use mostrador_core::{LowStockAlert, Money};

    fn sell(items: &[(&str, i64)]) -> SellArgs {
        SellArgs {
            seller: Some("Ana".to_string()),
            items: items
                .iter()
                .map(|(code, quantity)| SaleItem {
                    code: code.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_sell_commits_and_clears_cart() {
        let mut register = register(FakeBackend::new(catalog()));

        run(&mut register, sell(&[("CAM001", 2), ("PAN002", 1)]), Output::new(true))
            .await
            .unwrap();

        assert!(register.cart().is_empty());
        assert_eq!(register.snapshot().lookup("1").unwrap().quantity_on_hand, 3);
        assert_eq!(register.snapshot().lookup("2").unwrap().quantity_on_hand, 0);
    }

    #[tokio::test]
    async fn test_sell_over_stock_fails_before_submitting() {
        let mut register = register(FakeBackend::new(catalog()));

        let err = run(&mut register, sell(&[("PAN002", 2)]), Output::new(true))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(register.cart().is_empty());
    }

    #[tokio::test]
    async fn test_sell_rejected_keeps_cart() {
        let mut backend = FakeBackend::new(catalog());
        backend.reject_with = Some("Stock insuficiente para CAM001".to_string());
        let mut register = register(backend);

        let err = run(&mut register, sell(&[("CAM001", 2)]), Output::new(true))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SaleRejected);
        assert!(err.message.contains("Stock insuficiente para CAM001"));
        assert_eq!(register.cart().total_quantity(), 2);
        assert_eq!(register.snapshot().lookup("1").unwrap().quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn test_render_cart_total() {
        let mut register = register(FakeBackend::new(catalog()));
        register.refresh().await.unwrap();
        register.add_by_code("CAM001", 2).unwrap();
        register.add_by_code("PAN002", 1).unwrap();

        let text = render_cart(register.cart());
        assert!(text.ends_with("Total:  $23.50"));
        assert!(text.contains("Seller: Sistema"));
    }

    #[test]
    fn test_render_receipt_shows_alerts_verbatim() {
        let receipt = SaleReceipt {
            sale_id: "VTA-20240301-abcd1234".to_string(),
            total: Money::from_cents(2350),
            item_count: 2,
            alerts: vec![LowStockAlert {
                product: "A".to_string(),
                remaining_quantity: 1,
            }],
            seller: "Ana".to_string(),
            lines: Vec::new(),
        };

        let text = render_receipt(&receipt);
        assert!(text.starts_with("Sale VTA-20240301-abcd1234 committed"));
        assert!(text.contains("Total:  $23.50"));
        assert!(text.ends_with("  A: 1 remaining"));
    }

    #[test]
    fn test_render_shortfalls() {
        let text = render_shortfalls(&[StockShortfall {
            product_id: "1".to_string(),
            code: "CAM001".to_string(),
            requested: 3,
            available: 1,
        }]);
        assert_eq!(text, "Current stock cannot cover:\n  CAM001: requested 3, available 1");
    }
}
