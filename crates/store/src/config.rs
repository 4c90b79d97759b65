//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROCKETCART_API_URL` - Base URL of the stock/product service (default: <http://localhost:3333>)
//! - `ROCKETCART_API_TOKEN` - Bearer token sent to the stock/product service
//! - `ROCKETCART_STORAGE_PATH` - Local storage file (default: rocketcart-storage.json)
//! - `ROCKETCART_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ROCKETCART_PRODUCT_CACHE_TTL_SECS` - Catalog cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = "rocketcart-storage.json";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the stock/product service
    pub api_url: Url,
    /// Optional bearer token for the stock/product service
    pub api_token: Option<SecretString>,
    /// File backing local storage
    pub storage_path: PathBuf,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// How long catalog entries stay cached
    pub product_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("storage_path", &self.storage_path)
            .field("http_timeout", &self.http_timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&get_or_default(&lookup, "ROCKETCART_API_URL", DEFAULT_API_URL))?;
        let api_token = get_optional(&lookup, "ROCKETCART_API_TOKEN").map(SecretString::from);
        let storage_path = PathBuf::from(get_or_default(
            &lookup,
            "ROCKETCART_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let http_timeout = parse_secs(&lookup, "ROCKETCART_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let product_cache_ttl = parse_secs(
            &lookup,
            "ROCKETCART_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )?;
        let sentry_dsn = get_optional(&lookup, "SENTRY_DSN");

        Ok(Self {
            api_url,
            api_token,
            storage_path,
            http_timeout,
            product_cache_ttl,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<Duration, ConfigError> {
    get_or_default(lookup, key, default)
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the service base URL, forcing a trailing slash so relative joins
/// (`stock/1`) append instead of replacing the last path segment.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("ROCKETCART_API_URL".to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "ROCKETCART_API_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
