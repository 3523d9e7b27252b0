//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `YLK_HOST` - Bind address (default: 127.0.0.1)
//! - `YLK_PORT` - Listen port (default: 3000)
//! - `YLK_CATALOG` - Catalog document, URL or file path (default: products.json)
//! - `YLK_DATA_DIR` - Directory backing local storage (default: .ylk)
//! - `YLK_SIGNAL_POLL_MS` - How often to look for catalog-changed signals (default: 1000)
//! - `YLK_STATIC_DIR` - Static assets served at the site root (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::CatalogLocation;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_CATALOG: &str = "products.json";
const DEFAULT_DATA_DIR: &str = ".ylk";
const DEFAULT_SIGNAL_POLL_MS: &str = "1000";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the preview server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the product catalog is fetched from
    pub catalog: CatalogLocation,
    /// Directory holding the persisted storage area
    pub data_dir: PathBuf,
    /// Poll interval for the catalog-changed sentinel
    pub signal_poll: Duration,
    /// Static asset directory
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
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
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("YLK_HOST", &var("YLK_HOST", DEFAULT_HOST))?;
        let port = parse_var("YLK_PORT", &var("YLK_PORT", DEFAULT_PORT))?;
        let catalog = CatalogLocation::parse(&var("YLK_CATALOG", DEFAULT_CATALOG))
            .map_err(|e| ConfigError::InvalidEnvVar("YLK_CATALOG".to_string(), e.to_string()))?;
        let poll_ms: u64 = parse_var(
            "YLK_SIGNAL_POLL_MS",
            &var("YLK_SIGNAL_POLL_MS", DEFAULT_SIGNAL_POLL_MS),
        )?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "YLK_SIGNAL_POLL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            catalog,
            data_dir: PathBuf::from(var("YLK_DATA_DIR", DEFAULT_DATA_DIR)),
            signal_poll: Duration::from_millis(poll_ms),
            static_dir: PathBuf::from(var("YLK_STATIC_DIR", DEFAULT_STATIC_DIR)),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
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

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
