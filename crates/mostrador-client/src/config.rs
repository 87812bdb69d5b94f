//! # Client Configuration
//!
//! Configuration management for the backend client and the register.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOSTRADOR_BACKEND_URL=http://10.0.0.5:5000/api                     │
//! │     MOSTRADOR_SELLER=Ana                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/mostrador/mostrador.toml (Linux)                         │
//! │     ~/Library/Application Support/com.mostrador.pos/mostrador.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api, seller "Sistema"                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # mostrador.toml
//! [backend]
//! base_url = "http://localhost:5000/api"
//! request_timeout_secs = 10
//! sale_timeout_secs = 30
//!
//! [register]
//! seller = "Sistema"
//! history_limit = 50
//! refresh_after_sale = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use mostrador_core::validation::{validate_history_limit, validate_seller};
use mostrador_core::DEFAULT_SELLER;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for every request (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Bound on the whole sale submission (seconds).
    #[serde(default = "default_sale_timeout")]
    pub sale_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_sale_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            sale_timeout_secs: default_sale_timeout(),
        }
    }
}

// =============================================================================
// Register Settings
// =============================================================================

/// Behavior of the register session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSettings {
    /// Seller recorded on sales.
    #[serde(default = "default_seller")]
    pub seller: String,

    /// Rows requested from the history endpoint.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Re-fetch the inventory after every committed sale.
    #[serde(default = "default_true")]
    pub refresh_after_sale: bool,
}

fn default_seller() -> String {
    DEFAULT_SELLER.to_string()
}

fn default_history_limit() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

impl Default for RegisterSettings {
    fn default() -> Self {
        RegisterSettings {
            seller: default_seller(),
            history_limit: default_history_limit(),
            refresh_after_sale: true,
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub register: RegisterSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (mostrador.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.backend.request_timeout_secs == 0 {
            return Err(ClientError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.backend.sale_timeout_secs == 0 {
            return Err(ClientError::Config(
                "sale_timeout_secs must be greater than 0".into(),
            ));
        }

        validate_seller(&self.register.seller).map_err(|e| ClientError::Config(e.to_string()))?;
        validate_history_limit(self.register.history_limit)
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MOSTRADOR_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Ok(secs) = std::env::var("MOSTRADOR_REQUEST_TIMEOUT") {
            match secs.parse::<u64>() {
                Ok(s) => self.backend.request_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MOSTRADOR_REQUEST_TIMEOUT"),
            }
        }

        if let Ok(secs) = std::env::var("MOSTRADOR_SALE_TIMEOUT") {
            match secs.parse::<u64>() {
                Ok(s) => self.backend.sale_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MOSTRADOR_SALE_TIMEOUT"),
            }
        }

        if let Ok(seller) = std::env::var("MOSTRADOR_SELLER") {
            debug!(seller = %seller, "Overriding seller from environment");
            self.register.seller = seller;
        }

        if let Ok(limit) = std::env::var("MOSTRADOR_HISTORY_LIMIT") {
            if let Ok(l) = limit.parse::<u32>() {
                self.register.history_limit = l;
            }
        }

        if let Ok(flag) = std::env::var("MOSTRADOR_REFRESH_AFTER_SALE") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.register.refresh_after_sale = true,
                "0" | "false" | "no" | "off" => self.register.refresh_after_sale = false,
                _ => warn!(value = %flag, "Unknown MOSTRADOR_REFRESH_AFTER_SALE value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mostrador", "pos")
            .map(|dirs| dirs.config_dir().join("mostrador.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL; must be http or https.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.backend.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(self.backend.base_url.clone()));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn sale_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.sale_timeout_secs)
    }

    pub fn seller(&self) -> &str {
        &self.register.seller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.sale_timeout(), Duration::from_secs(30));
        assert_eq!(config.seller(), "Sistema");
        assert_eq!(config.register.history_limit, 50);
        assert!(config.register.refresh_after_sale);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.backend.base_url = "ws://localhost:5000".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.backend.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.backend.base_url = "https://pos.example.com/api".to_string();
        assert!(config.validate().is_ok());

        config.backend.sale_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
        config.backend.sale_timeout_secs = 30;

        config.register.history_limit = 0;
        assert!(config.validate().is_err());
        config.register.history_limit = 50;

        config.register.seller = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [register]
            seller = "Ana"
            "#,
        )
        .unwrap();

        assert_eq!(config.seller(), "Ana");
        assert_eq!(config.register.history_limit, 50);
        assert_eq!(config.backend.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("mostrador-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(config.register.history_limit, 50);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("mostrador-{}.toml", uuid::Uuid::new_v4()));
        let mut config = ClientConfig::default();
        config.register.history_limit = 200;
        config.register.refresh_after_sale = false;
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.register.history_limit, 200);
        assert!(!loaded.register.refresh_after_sale);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ClientConfig::default()).unwrap();
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("[register]"));
    }
}
