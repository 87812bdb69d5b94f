//! `inventory`, `alerts` and `product` subcommands.

use mostrador_client::{Backend, Register};
use mostrador_core::{Product, StockAlert};
use tracing::debug;

use super::{column, Output};
use crate::cli::{InventoryArgs, ProductArgs};
use crate::error::AppError;

pub async fn run<B: Backend>(
    register: &mut Register<B>,
    args: InventoryArgs,
    out: Output,
) -> Result<(), AppError> {
    register.refresh().await?;

    let products: Vec<&Product> = if args.low_stock {
        register.low_stock()
    } else {
        register.snapshot().products().iter().collect()
    };
    debug!(listed = products.len(), low_stock_only = args.low_stock, "Listing inventory");

    let low_stock = register.low_stock().len();
    out.emit(&products, |products| render_products(products, low_stock))
}

pub async fn alerts<B: Backend>(register: &mut Register<B>, out: Output) -> Result<(), AppError> {
    let alerts = register.alerts().await?;
    out.emit(&alerts, |alerts| render_alerts(alerts))
}

pub async fn product<B: Backend>(
    register: &mut Register<B>,
    args: ProductArgs,
    out: Output,
) -> Result<(), AppError> {
    let product = register
        .lookup_remote(&args.code)
        .await?
        .ok_or_else(|| AppError::not_found("Product", &args.code))?;

    out.emit(&product, |p| render_products(&[p], usize::from(p.is_low_stock())))
}

pub fn render_products(products: &[&Product], low_stock: usize) -> String {
    let mut lines = vec![format!(
        "{} {} {:>10} {:>6} {:>6}",
        column("CODE", 12),
        column("NAME", 28),
        "PRICE",
        "STOCK",
        "MIN"
    )];

    for p in products {
        lines.push(format!(
            "{} {} {:>10} {:>6} {:>6}{}",
            column(&p.code, 12),
            column(&p.name, 28),
            p.unit_price.to_string(),
            p.quantity_on_hand,
            p.min_stock,
            if p.is_low_stock() { "  LOW" } else { "" }
        ));
    }

    if low_stock > 0 {
        lines.push(String::new());
        lines.push(format!("{} product(s) at or below minimum stock", low_stock));
    }
    lines.join("\n")
}

pub fn render_alerts(alerts: &[StockAlert]) -> String {
    if alerts.is_empty() {
        return "No low-stock alerts".to_string();
    }

    alerts
        .iter()
        .map(|a| format!("{} {}: {} left (minimum {})", a.code, a.name, a.quantity, a.minimum))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{catalog, register, FakeBackend};

    #[test]
    fn test_render_products_marks_low_stock() {
        let products = catalog();
        let refs: Vec<&Product> = products.iter().collect();
        let text = render_products(&refs, 1);

        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[0].starts_with("CODE"));
        assert!(rows[1].contains("CAM001") && rows[1].contains("$10.00"));
        assert!(!rows[1].ends_with("LOW"));
        assert!(rows[2].contains("PAN002") && rows[2].ends_with("LOW"));
        assert_eq!(rows.last(), Some(&"1 product(s) at or below minimum stock"));
    }

    #[test]
    fn test_render_alerts() {
        assert_eq!(render_alerts(&[]), "No low-stock alerts");

        let alerts = vec![StockAlert {
            code: "PAN002".to_string(),
            name: "Pantalón".to_string(),
            quantity: 1,
            minimum: 3,
        }];
        assert_eq!(render_alerts(&alerts), "PAN002 Pantalón: 1 left (minimum 3)");
    }

    #[tokio::test]
    async fn test_inventory_loads_snapshot() {
        let mut register = register(FakeBackend::new(catalog()));
        run(&mut register, InventoryArgs { low_stock: true }, Output::new(true))
            .await
            .unwrap();

        assert_eq!(register.snapshot().len(), 2);
        assert_eq!(register.low_stock().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let mut register = register(FakeBackend::new(catalog()));
        let err = product(&mut register, ProductArgs { code: "ZZZ999".to_string() }, Output::default())
            .await
            .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
