//! Application settings loading from config.toml
//!
//! The service reads an optional TOML file describing where to listen and which
//! defaults apply when a pricing request omits its optional parameters. A missing
//! file is not an error: every field has a default so the binary can start with
//! nothing but a `DATABASE_URL`.

use crate::core::{month::ProductionMonth, volume::DistributionMethod};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "COSTING_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Defaults for the pricing calculator
    pub pricing: PricingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API binds to
    pub bind_address: String,
    /// Include the underlying error text in 500 responses (development only)
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            expose_error_details: false,
        }
    }
}

/// Defaults applied when a pricing request leaves a parameter out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Month used when `productionMonth` is absent
    pub default_month: ProductionMonth,
    /// Volume basis used when `distributionMethod` is absent
    pub default_distribution_method: DistributionMethod,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_month: ProductionMonth::from_ym(2025, 8).unwrap_or_default(),
            default_distribution_method: DistributionMethod::Sales,
        }
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A month or distribution method value is malformed
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `$COSTING_CONFIG` or `./config.toml`.
///
/// A file that does not exist yields the built-in defaults; a file that exists
/// but cannot be parsed is an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        tracing::warn!(path = %path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    tracing::info!(
        path = %path,
        bind_address = %config.server.bind_address,
        default_month = %config.pricing.default_month,
        default_method = %config.pricing.default_distribution_method,
        "Loaded application configuration"
    );
    Ok(config)
}
