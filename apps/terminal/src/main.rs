//! # Mostrador Terminal Entry Point
//!
//! ```text
//! mostrador [--config PATH] [--backend-url URL] [--json] <COMMAND>
//!
//!   inventory [--low-stock]       list the inventory snapshot
//!   alerts                        backend low-stock alerts
//!   product CODE                  single product lookup
//!   sell [--seller NAME] CODE[:QTY]...
//!   history [--limit N] [--from DATE] [--to DATE]
//!   summary [--date DATE]
//! ```
//!
//! Exit status is 0 on success, otherwise the error code's exit status.

use clap::Parser;
use mostrador_terminal::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = mostrador_terminal::run(cli).await {
        mostrador_terminal::report_error(&err, json);
        std::process::exit(err.exit_code());
    }
}
