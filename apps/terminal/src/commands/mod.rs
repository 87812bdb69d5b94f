//! # Command Handlers
//!
//! Each subcommand is a thin call into a [`Register`]. Handlers are generic
//! over [`Backend`] so they run unchanged against an in-memory fake.
//!
//! ```text
//! Cli ──► dispatch() ──► inventory::run / sale::run / history::run ...
//!                              │
//!                              ▼
//!                     Register<B: Backend>
//!                              │
//!                              ▼
//!                Output::emit(value, render_fn)
//!                 ├── --json: serde_json
//!                 └── text:   render_* (String)
//! ```

pub mod history;
pub mod inventory;
pub mod sale;

use mostrador_client::{Backend, Register};
use serde::Serialize;

use crate::cli::Commands;
use crate::error::AppError;

/// Where command results go.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    /// Prints `value` as JSON, or the text produced by `render`.
    pub fn emit<T, F>(&self, value: &T, render: F) -> Result<(), AppError>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        println!("{}", self.format(value, render)?);
        Ok(())
    }

    fn format<T, F>(&self, value: &T, render: F) -> Result<String, AppError>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(render(value))
        }
    }
}

pub async fn dispatch<B: Backend>(
    register: &mut Register<B>,
    command: Commands,
    out: Output,
) -> Result<(), AppError> {
    match command {
        Commands::Inventory(args) => inventory::run(register, args, out).await,
        Commands::Alerts => inventory::alerts(register, out).await,
        Commands::Product(args) => inventory::product(register, args, out).await,
        Commands::Sell(args) => sale::run(register, args, out).await,
        Commands::History(args) => history::run(register, args, out).await,
        Commands::Summary(args) => history::summary(register, args, out).await,
    }
}

/// Pads or truncates `text` to exactly `width` characters.
pub(crate) fn column(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    let len = cell.chars().count();
    cell.extend(std::iter::repeat(' ').take(width - len));
    cell
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::Money;

    #[test]
    fn test_column() {
        assert_eq!(column("abc", 5), "abc  ");
        assert_eq!(column("abcdefgh", 4), "abcd");
        assert_eq!(column("Pantalón", 8), "Pantalón");
    }

    #[test]
    fn test_output_format() {
        let value = Money::from_cents(2350);
        let text = Output::new(false).format(&value, |m| format!("Total: {}", m)).unwrap();
        assert_eq!(text, "Total: $23.50");

        let json = Output::new(true).format(&value, |m| format!("Total: {}", m)).unwrap();
        assert_eq!(json, "2350");
    }
}
