//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8080)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://127.0.0.1:8080`)
//! - `STOREFRONT_STATIC_DIR` - Directory served for non-API paths (default: static)
//!
//! ## Carts
//! - `STOREFRONT_CART_IDLE_SECONDS` - Evict carts idle this long (default: 7200)
//! - `STOREFRONT_MAX_CARTS` - Maximum carts held in memory (default: 10000)
//!
//! ## Pricing
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD_CENTS` - default: 5000
//! - `STOREFRONT_FLAT_SHIPPING_CENTS` - default: 1000
//! - `STOREFRONT_MONTHLY_INTEREST_BPS` - default: 200
//! - `STOREFRONT_MAX_INSTALLMENTS` - default: 12
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment name reported to Sentry
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mercado_core::{Cents, PricingPolicy};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory of static assets served as the fallback
    pub static_dir: PathBuf,
    /// Carts untouched for this long are evicted
    pub cart_idle_timeout: Duration,
    /// Upper bound on carts held in memory
    pub max_carts: u64,
    /// Shipping and installment constants
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            base_url: "http://127.0.0.1:8080".to_string(),
            static_dir: PathBuf::from("static"),
            cart_idle_timeout: Duration::from_secs(2 * 60 * 60),
            max_carts: 10_000,
            pricing: PricingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or
    /// if the resulting pricing policy is inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let pricing = pricing_with(get_optional_env)?;

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", defaults.host)?,
            port: parse_env_or("STOREFRONT_PORT", defaults.port)?,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", &defaults.base_url),
            static_dir: get_optional_env("STOREFRONT_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            cart_idle_timeout: Duration::from_secs(parse_env_or(
                "STOREFRONT_CART_IDLE_SECONDS",
                defaults.cart_idle_timeout.as_secs(),
            )?),
            max_carts: parse_env_or("STOREFRONT_MAX_CARTS", defaults.max_carts)?,
            pricing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: parse_env_or(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Load the pricing policy from the `STOREFRONT_*` pricing variables.
///
/// The storefront and the CLI both price through this, so quotes printed
/// offline match what checkout charges.
///
/// # Errors
///
/// Returns `ConfigError` if a pricing variable cannot be parsed or the
/// resulting policy is inconsistent.
pub fn pricing_from_env() -> Result<PricingPolicy, ConfigError> {
    let _ = dotenvy::dotenv();
    pricing_with(get_optional_env)
}

fn pricing_with(lookup: impl Fn(&str) -> Option<String>) -> Result<PricingPolicy, ConfigError> {
    let defaults = PricingPolicy::default();

    let pricing = PricingPolicy {
        free_shipping_threshold: Cents::new(lookup_or(
            &lookup,
            "STOREFRONT_FREE_SHIPPING_THRESHOLD_CENTS",
            defaults.free_shipping_threshold.as_i64(),
        )?),
        flat_shipping_fee: Cents::new(lookup_or(
            &lookup,
            "STOREFRONT_FLAT_SHIPPING_CENTS",
            defaults.flat_shipping_fee.as_i64(),
        )?),
        interest_free_installments: defaults.interest_free_installments,
        monthly_interest_bps: lookup_or(
            &lookup,
            "STOREFRONT_MONTHLY_INTEREST_BPS",
            defaults.monthly_interest_bps,
        )?,
        max_installments: lookup_or(
            &lookup,
            "STOREFRONT_MAX_INSTALLMENTS",
            defaults.max_installments,
        )?,
    };
    pricing
        .validate()
        .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_*".to_string(), e.to_string()))?;
    Ok(pricing)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup_or(&get_optional_env, key, default)
}

fn lookup_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cart_idle_timeout, Duration::from_secs(7200));
        assert_eq!(config.max_carts, 10_000);
        assert_eq!(config.pricing, PricingPolicy::default());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = StorefrontConfig {
            base_url: "https://mercado.exemplo.com".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 8081 ").unwrap(), 8081);
        assert_eq!(
            parse_value::<IpAddr>("HOST", "10.0.0.1").unwrap(),
            IpAddr::from([10, 0, 0, 1])
        );
    }

    #[test]
    fn test_parse_value_invalid() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));

        let err = parse_value::<u8>("STOREFRONT_MAX_INSTALLMENTS", "300").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_MAX_INSTALLMENTS"));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_pricing_defaults_when_unset() {
        let pricing = pricing_with(lookup_from(&[])).unwrap();
        assert_eq!(pricing, PricingPolicy::default());
    }

    #[test]
    fn test_pricing_overrides() {
        let pricing = pricing_with(lookup_from(&[
            ("STOREFRONT_FREE_SHIPPING_THRESHOLD_CENTS", "8000"),
            ("STOREFRONT_FLAT_SHIPPING_CENTS", "1500"),
            ("STOREFRONT_MONTHLY_INTEREST_BPS", "300"),
            ("STOREFRONT_MAX_INSTALLMENTS", "6"),
        ]))
        .unwrap();

        assert_eq!(pricing.free_shipping_threshold, Cents::new(8000));
        assert_eq!(pricing.flat_shipping_fee, Cents::new(1500));
        assert_eq!(pricing.monthly_interest_bps, 300);
        assert_eq!(pricing.max_installments, 6);
    }

    #[test]
    fn test_pricing_rejects_bad_values() {
        let err = pricing_with(lookup_from(&[("STOREFRONT_FLAT_SHIPPING_CENTS", "dez")]))
            .unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_FLAT_SHIPPING_CENTS"));

        assert!(pricing_with(lookup_from(&[("STOREFRONT_MAX_INSTALLMENTS", "0")])).is_err());
    }
}
