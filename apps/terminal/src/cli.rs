//! Command-line surface of the `mostrador` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mostrador", about = "Mostrador POS register", long_about = None)]
pub struct Cli {
    /// Path to mostrador.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "MOSTRADOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the inventory and list products
    Inventory(InventoryArgs),
    /// Show the backend's low-stock alerts
    Alerts,
    /// Look up a single product by code
    Product(ProductArgs),
    /// Build a cart from CODE[:QTY] items and submit it as one sale
    Sell(SellArgs),
    /// List past sales grouped by transaction
    History(HistoryArgs),
    /// Daily sales summary
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Only list products at or below their minimum stock
    #[arg(long)]
    pub low_stock: bool,
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    pub code: String,
}

#[derive(Debug, Args)]
pub struct SellArgs {
    /// Seller recorded on the sale (defaults to the configured seller)
    #[arg(long)]
    pub seller: Option<String>,

    /// Items as CODE or CODE:QTY
    #[arg(required = true, value_parser = parse_sale_item)]
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of rows to fetch
    #[arg(long)]
    pub limit: Option<u32>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Day to summarize (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub date: Option<String>,
}

/// One `CODE[:QTY]` argument of `sell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    pub code: String,
    pub quantity: i64,
}

pub fn parse_sale_item(raw: &str) -> Result<SaleItem, String> {
    let (code, quantity) = match raw.split_once(':') {
        Some((code, qty)) => {
            let quantity = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity '{}' in '{}'", qty, raw))?;
            (code, quantity)
        }
        None => (raw, 1),
    };

    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing product code in '{}'", raw));
    }
    if quantity <= 0 {
        return Err(format!("quantity must be positive in '{}'", raw));
    }

    Ok(SaleItem {
        code: code.to_string(),
        quantity,
    })
}
