//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - One of `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` or `SHOPIFY_STOREFRONT_PUBLIC_TOKEN`
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` session store (falls back to `DATABASE_URL`;
//!   sessions are kept in memory when neither is set)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `STOREFRONT_CATALOG_SIZE` - Products fetched at startup (default: 50, max 250)
//! - `STOREFRONT_DELIVERY_FEE` - Flat delivery fee (default: 10)
//! - `STOREFRONT_CHECKOUT_CART_POLICY` - `retain` (default) or `clear`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Shopify caps `first` at 250 per connection page.
pub const MAX_CATALOG_SIZE: i64 = 250;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` session store URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Cart and checkout behaviour
    pub shop: ShopConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API public access token (safe to expose in browser)
    pub storefront_public_token: Option<String>,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: Option<SecretString>,
    /// Number of products fetched into the catalog
    pub catalog_size: i64,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_public_token", &self.storefront_public_token)
            .field(
                "storefront_private_token",
                &self.storefront_private_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_size", &self.catalog_size)
            .finish()
    }
}

/// What happens to the cart once its contents are recorded as an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutCartPolicy {
    /// Keep the cart so the shopper can order the same items again.
    #[default]
    Retain,
    /// Empty the cart after checkout.
    Clear,
}

impl FromStr for CheckoutCartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "clear" => Ok(Self::Clear),
            other => Err(format!("expected `retain` or `clear`, got `{other}`")),
        }
    }
}

/// Cart and checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Flat delivery fee added to non-empty carts
    pub delivery_fee: Decimal,
    /// Cart handling after checkout
    pub checkout_cart_policy: CheckoutCartPolicy,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::from(10),
            checkout_cart_policy: CheckoutCartPolicy::Retain,
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
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let shop = ShopConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            shopify,
            shop,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
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

impl ShopifyStorefrontConfig {
    /// Load the Shopify section on its own (also used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store or both tokens are missing, or the
    /// private token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storefront_private_token = match get_optional_env("SHOPIFY_STOREFRONT_PRIVATE_TOKEN") {
            Some(_) => Some(get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?),
            None => None,
        };
        let storefront_public_token = get_optional_env("SHOPIFY_STOREFRONT_PUBLIC_TOKEN");
        if storefront_private_token.is_none() && storefront_public_token.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "SHOPIFY_STOREFRONT_PRIVATE_TOKEN or SHOPIFY_STOREFRONT_PUBLIC_TOKEN".to_string(),
            ));
        }

        let catalog_size = parse_env_or_default::<i64>("STOREFRONT_CATALOG_SIZE", "50")?;
        if !(1..=MAX_CATALOG_SIZE).contains(&catalog_size) {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CATALOG_SIZE".to_string(),
                format!("must be between 1 and {MAX_CATALOG_SIZE}"),
            ));
        }

        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_public_token,
            storefront_private_token,
            catalog_size,
        })
    }

    /// GraphQL endpoint for this store.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store, self.api_version
        )
    }
}

impl ShopConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let delivery_fee = parse_env_or_default::<Decimal>("STOREFRONT_DELIVERY_FEE", "10")?;
        if delivery_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_DELIVERY_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let checkout_cart_policy =
            parse_env_or_default::<CheckoutCartPolicy>("STOREFRONT_CHECKOUT_CART_POLICY", "retain")?;

        Ok(Self {
            delivery_fee,
            checkout_cart_policy,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens are random hex or base62 and clear this easily
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Shopify issued."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify_config() -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_public_token: Some("public_token_value".to_string()),
            storefront_private_token: Some(SecretString::from("super_secret_private_token")),
            catalog_size: 50,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-storefront-token", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("shpat_9f3Kd82LmQ0zXw7Rt5Yb1Nc4Vh6Gj", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_checkout_policy_parse() {
        assert_eq!("retain".parse(), Ok(CheckoutCartPolicy::Retain));
        assert_eq!(" Clear ".parse(), Ok(CheckoutCartPolicy::Clear));
        assert!("keep".parse::<CheckoutCartPolicy>().is_err());
    }

    #[test]
    fn test_shop_config_default() {
        let shop = ShopConfig::default();
        assert_eq!(shop.delivery_fee, Decimal::from(10));
        assert_eq!(shop.checkout_cart_policy, CheckoutCartPolicy::Retain);
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            shopify_config().endpoint(),
            "https://test.myshopify.com/api/2026-01/graphql.json"
        );
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let config = StorefrontConfig {
            database_url: None,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://shop.example.org".to_string(),
            shopify: shopify_config(),
            shop: ShopConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.is_secure());
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify_config());

        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("public_token_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_token"));
    }
}
