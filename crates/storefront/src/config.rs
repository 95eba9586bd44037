//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `LUXE_HOST` - Bind address (default: 127.0.0.1)
//! - `LUXE_PORT` - Listen port (default: 3000)
//! - `LUXE_BASE_URL` - Public URL for the storefront (default: `http://localhost:<port>`)
//! - `LUXE_DATA_DIR` - Directory for persisted carts and wishlists. When unset,
//!   client stores live in memory and are lost on eviction or restart.
//! - `LUXE_ADMIN_EMAIL` - Login email (default: admin@luxecollection.com)
//! - `LUXE_ADMIN_PASSWORD` - Login password (default: luxury123)
//! - `LUXE_STORE_IDLE_SECS` - Seconds before an idle client store is evicted (default: 1800)
//! - `LUXE_STATIC_DIR` - Directory served under `/static` and `/assets`
//! - `LUXE_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use luxe_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_ADMIN_EMAIL: &str = "admin@luxecollection.com";
const DEFAULT_ADMIN_PASSWORD: &str = "luxury123";
const DEFAULT_STORE_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    pub base_url: Url,
    /// Root directory for per-client persisted stores
    pub data_dir: Option<PathBuf>,
    /// How long an unused client store stays cached
    pub store_idle: Duration,
    /// Static asset directory
    pub static_dir: PathBuf,
    /// Login credentials
    pub admin: AdminCredentials,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines for local development.
    #[default]
    Text,
    /// One JSON object per event for log shippers.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// The single credential pair accepted by the login form.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    /// Returns true if the submitted pair matches.
    ///
    /// Compares the full password regardless of where the first mismatch is.
    #[must_use]
    pub fn verify(&self, email: &Email, password: &str) -> bool {
        let expected = self.password.expose_secret().as_bytes();
        let given = password.as_bytes();
        let same_password = expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0;
        same_password && email == &self.email
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: Email::parse(DEFAULT_ADMIN_EMAIL)
                .unwrap_or_else(|_| unreachable!("default admin email is valid")),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

impl Default for StorefrontConfig {
    /// Local development defaults with in-memory client stores.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: Url::parse("http://localhost:3000")
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            data_dir: None,
            store_idle: Duration::from_secs(DEFAULT_STORE_IDLE_SECS),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            admin: AdminCredentials::default(),
            log_format: LogFormat::Text,
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
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("LUXE_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = parse_env("LUXE_PORT", "3000", str::parse::<u16>)?;
        let base_url = parse_env(
            "LUXE_BASE_URL",
            &format!("http://localhost:{port}"),
            Url::parse,
        )?;
        let data_dir = get_optional_env("LUXE_DATA_DIR").map(PathBuf::from);
        let idle_secs = parse_env(
            "LUXE_STORE_IDLE_SECS",
            &DEFAULT_STORE_IDLE_SECS.to_string(),
            str::parse::<u64>,
        )?;
        if idle_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "LUXE_STORE_IDLE_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let static_dir = PathBuf::from(get_env_or_default("LUXE_STATIC_DIR", DEFAULT_STATIC_DIR));

        let admin = AdminCredentials {
            email: parse_env("LUXE_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL, Email::parse)?,
            password: get_secret_or_default("LUXE_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD)?,
        };

        let log_format = parse_env("LUXE_LOG_FORMAT", "text", str::parse::<LogFormat>)?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            store_idle: Duration::from_secs(idle_secs),
            static_dir,
            admin,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `parse`.
fn parse_env<T, E: std::fmt::Display>(
    key: &str,
    default: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    let raw = get_env_or_default(key, default);
    parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a secret with a default. A set-but-blank value is rejected.
fn get_secret_or_default(key: &str, default: &str) -> Result<SecretString, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.is_empty() => Err(ConfigError::MissingEnvVar(key.to_string())),
        Ok(value) => Ok(SecretString::from(value)),
        Err(_) => Ok(SecretString::from(default)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.admin.email.as_str(), "admin@luxecollection.com");
        assert_eq!(config.store_idle, Duration::from_secs(1800));
        assert!(config.data_dir.is_none());
        assert!(config.static_dir.ends_with("static"));
    }

    #[test]
    fn test_admin_debug_redacts_password() {
        let admin = AdminCredentials {
            email: Email::parse("owner@luxecollection.com").unwrap(),
            password: SecretString::from("super_secret_password"),
        };

        let debug_output = format!("{admin:?}");

        assert!(debug_output.contains("owner@luxecollection.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));
    }

    #[test]
    fn test_admin_verify() {
        let admin = AdminCredentials::default();
        let email = Email::parse("admin@luxecollection.com").unwrap();
        let shouting = Email::parse("ADMIN@LuxeCollection.com").unwrap();
        let other = Email::parse("guest@luxecollection.com").unwrap();

        assert!(admin.verify(&email, "luxury123"));
        assert!(admin.verify(&shouting, "luxury123"));
        assert!(!admin.verify(&email, "luxury1234"));
        assert!(!admin.verify(&email, "Luxury123"));
        assert!(!admin.verify(&email, ""));
        assert!(!admin.verify(&other, "luxury123"));
    }

    #[test]
    fn test_parse_env_reports_key() {
        let err = parse_env("LUXE_TEST_UNSET_PORT", "not-a-port", str::parse::<u16>).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "LUXE_TEST_UNSET_PORT"));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_env_uses_default() {
        let value = parse_env("LUXE_TEST_UNSET_IDLE", "42", str::parse::<u64>).unwrap();
        assert_eq!(value, 42);
    }
}
