//! `history` and `summary` subcommands.

use mostrador_client::{Backend, HistoryQuery, Register};
use mostrador_core::{DailySummary, SaleTransaction};
use serde::Serialize;

use super::{column, Output};
use crate::cli::{HistoryArgs, SummaryArgs};
use crate::error::AppError;

pub async fn run<B: Backend>(register: &mut Register<B>, args: HistoryArgs, out: Output) -> Result<(), AppError> {
    let query = HistoryQuery {
        limit: args.limit,
        date_from: args.from,
        date_to: args.to,
    };
    let transactions = register.transactions(Some(query)).await?;
    out.emit(&transactions, |t| render_transactions(t))
}

/// Summary plus its rows regrouped into transactions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    #[serde(flatten)]
    summary: DailySummary,
    transactions: Vec<SaleTransaction>,
}

pub async fn summary<B: Backend>(register: &mut Register<B>, args: SummaryArgs, out: Output) -> Result<(), AppError> {
    let summary = register.summary(args.date.as_deref()).await?;
    let report = SummaryReport {
        transactions: summary.transactions(),
        summary,
    };
    out.emit(&report, |r| render_summary(&r.summary, &r.transactions))
}

pub fn render_transactions(transactions: &[SaleTransaction]) -> String {
    if transactions.is_empty() {
        return "No sales found".to_string();
    }

    let mut lines = Vec::new();
    for t in transactions {
        lines.push(format!(
            "{}  {} {}  {}  {} unit(s)  {}",
            t.id,
            t.date,
            t.time,
            column(&t.seller, 16),
            t.quantity(),
            t.total
        ));
        for item in &t.items {
            lines.push(format!(
                "    {} {} {:>4} x {:>10} = {:>10}",
                column(&item.code, 12),
                column(&item.name, 24),
                item.quantity,
                item.unit_price.to_string(),
                item.subtotal.to_string()
            ));
        }
    }
    lines.join("\n")
}

pub fn render_summary(summary: &DailySummary, transactions: &[SaleTransaction]) -> String {
    let header = [
        format!("Summary for {}", summary.date),
        format!("Sales:      {}", summary.total_sale_count),
        format!("Items sold: {}", summary.items_sold_count),
        format!("Revenue:    {}", summary.total_amount),
    ]
    .join("\n");

    if transactions.is_empty() {
        header
    } else {
        format!("{}\n\n{}", header, render_transactions(transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{catalog, record, register, FakeBackend};
    use mostrador_core::{group_by_transaction, Money};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_history_passes_filters() {
        let backend = Arc::new(FakeBackend::new(catalog()));
        let mut register = register(Arc::clone(&backend));
        let args = HistoryArgs {
            limit: None,
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-31".to_string()),
        };
        run(&mut register, args, Output::new(true)).await.unwrap();

        let queries = backend.queries.lock().unwrap();
        assert_eq!(
            queries[0],
            HistoryQuery {
                limit: Some(50),
                date_from: Some("2024-03-01".to_string()),
                date_to: Some("2024-03-31".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_history_rejects_inverted_range() {
        let mut register = register(FakeBackend::new(catalog()));
        let args = HistoryArgs {
            limit: Some(10),
            from: Some("2024-03-31".to_string()),
            to: Some("2024-03-01".to_string()),
        };
        let err = run(&mut register, args, Output::new(true)).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_render_transactions_groups_rows() {
        let rows = vec![
            record("VTA-1", "CAM001", 2, 1000, 2350),
            record("VTA-1", "PAN002", 1, 350, 2350),
            record("VTA-2", "CAM001", 1, 1000, 1000),
        ];
        let text = render_transactions(&group_by_transaction(&rows));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("VTA-1") && lines[0].ends_with("3 unit(s)  $23.50"));
        assert!(lines[1].contains("CAM001") && lines[1].ends_with("$20.00"));
        assert!(lines[3].starts_with("VTA-2"));
    }

    #[test]
    fn test_render_empty_summary() {
        let summary = DailySummary {
            date: "2024-03-02".to_string(),
            total_amount: Money::zero(),
            total_sale_count: 0,
            items_sold_count: 0,
            sales: Vec::new(),
        };
        let text = render_summary(&summary, &summary.transactions());
        assert_eq!(
            text,
            "Summary for 2024-03-02\nSales:      0\nItems sold: 0\nRevenue:    $0.00"
        );
        assert_eq!(render_transactions(&[]), "No sales found");
    }
}
