//! # Mostrador Terminal Library
//!
//! Command-line register for Mostrador POS. Everything here is thin
//! orchestration over `mostrador-client`.
//!
//! ## Module Organization
//! ```text
//! mostrador_terminal/
//! ├── lib.rs          ◄─── You are here (logging, config, dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch and output formatting
//! │   ├── inventory.rs◄─── inventory, alerts, product
//! │   ├── sale.rs     ◄─── sell
//! │   └── history.rs  ◄─── history, summary
//! └── error.rs        ◄─── AppError and exit codes
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (stderr, so `--json` output stays clean)
//! 3. Load `ClientConfig` (file → env → `--backend-url`)
//! 4. Build `HttpBackend` and `Register`
//! 5. Run the subcommand

pub mod cli;
pub mod commands;
pub mod error;

use std::path::PathBuf;

use mostrador_client::{ClientConfig, HttpBackend, Register};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Output;
use error::AppError;

/// Runs one command to completion.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    let config = load_config(cli.config, cli.backend_url)?;
    info!(backend = %config.backend.base_url, "Starting register");

    let backend = HttpBackend::from_config(&config)?;
    let mut register = Register::new(backend, &config)?;

    commands::dispatch(&mut register, cli.command, Output::new(cli.json)).await
}

/// Loads the config file and applies a command-line backend URL on top.
pub fn load_config(path: Option<PathBuf>, backend_url: Option<String>) -> Result<ClientConfig, AppError> {
    let mut config = ClientConfig::load(path)?;

    if let Some(url) = backend_url {
        debug!(url = %url, "Overriding backend URL from command line");
        config.backend.base_url = url;
        config.validate()?;
    }

    Ok(config)
}

/// Prints `err` to stderr, as JSON when `json` is set.
pub fn report_error(err: &AppError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador_client=trace` - Trace the backend client only
/// - Default: `info,mostrador=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    #[cfg(not(test))]
    subscriber.init();

    // Several tests may install it.
    #[cfg(test)]
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
        tracing::info!("subscriber installed");
    }

    #[test]
    fn test_backend_url_override() {
        let missing = std::env::temp_dir().join("mostrador-terminal-missing.toml");
        let config = load_config(Some(missing), Some("http://pos.local:8080/api".to_string())).unwrap();
        assert_eq!(config.backend.base_url, "http://pos.local:8080/api");
    }

    #[test]
    fn test_invalid_backend_url_is_config_error() {
        let missing = std::env::temp_dir().join("mostrador-terminal-missing.toml");
        let err = load_config(Some(missing), Some("ftp://pos.local".to_string())).unwrap_err();
        assert_eq!(err.code, ErrorCode::Config);
    }
}
