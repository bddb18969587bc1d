//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the cart slot (default: data)
//! - `STOREFRONT_STATIC_DIR` - Directory with `img/` product images
//!   (default: crates/storefront/static)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog replacing the built-in one
//! - `STOREFRONT_TAX_RATE` - Checkout tax rate as a fraction (default: 0.065)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Default checkout tax rate (6.5%).
pub const DEFAULT_TAX_RATE: &str = "0.065";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory backing the durable cart slot
    pub data_dir: PathBuf,
    /// Directory served for static assets
    pub static_dir: PathBuf,
    /// Optional catalog file overriding the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Tax rate applied at checkout
    pub tax_rate: Decimal,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("crates/storefront/static"),
            catalog_path: None,
            tax_rate: Decimal::new(65, 3),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_env(&lookup, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env(&lookup, "STOREFRONT_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default(&lookup, "STOREFRONT_DATA_DIR", "data"));
        let static_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));
        let catalog_path = get_optional_env(&lookup, "STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let tax_rate = parse_env(&lookup, "STOREFRONT_TAX_RATE", DEFAULT_TAX_RATE)?;
        validate_tax_rate(tax_rate, "STOREFRONT_TAX_RATE")?;
        let log_format = parse_env(&lookup, "STOREFRONT_LOG_FORMAT", "pretty")?;

        Ok(Self {
            host,
            port,
            data_dir,
            static_dir,
            catalog_path,
            tax_rate,
            log_format,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable (or its default) with `FromStr`.
fn parse_env<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Tax rates are fractions in `[0, 1)`.
fn validate_tax_rate(rate: Decimal, var_name: &str) -> Result<(), ConfigError> {
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be a fraction between 0 and 1 (got {rate})"),
        ));
    }
    Ok(())
}
