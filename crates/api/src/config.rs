//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_TOKEN` - Shared secret for admin-only endpoints (min 16 chars, high entropy)
//! - `MINISHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; not needed when `MINISHOP_STORAGE=memory`)
//!
//! ## Optional
//! - `MINISHOP_STORAGE` - `postgres` (default) or `memory`
//! - `MINISHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `MINISHOP_PORT` - Listen port (default: 8000)
//! - `MINISHOP_BASE_URL` - Public URL (default: `http://127.0.0.1:8000`)
//! - `MINISHOP_MEDIA_ROOT` - Upload directory (default: `media`)
//! - `MINISHOP_MEDIA_URL` - URL prefix for uploads (default: `/media/`)
//! - `MINISHOP_MISSING_PRODUCT_POLICY` - `skip` (default) or `reject`
//! - `MINISHOP_STOCK_POLICY` - `lenient` (default) or `strict`
//! - `MINISHOP_LOG_FORMAT` - `text` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::services::{MissingProductPolicy, StockPolicy};

const MIN_ADMIN_TOKEN_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Where catalog, orders, accounts and sessions are kept.
#[derive(Debug, Clone)]
pub enum Storage {
    /// `PostgreSQL` at the given URL.
    Postgres(SecretString),
    /// Process memory; everything is lost on exit.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API application configuration.
///
/// Implements `Debug` manually to redact the admin token and database URL.
#[derive(Clone)]
pub struct ApiConfig {
    /// Storage backend
    pub storage: Storage,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https://` enables secure cookies
    pub base_url: String,
    /// Shared admin secret compared against `X-Admin-Token`
    pub admin_token: SecretString,
    /// Directory uploaded files are written to
    pub media_root: PathBuf,
    /// URL prefix uploaded files are served under (ends with `/`)
    pub media_url: String,
    /// Checkout behavior for vanished products
    pub missing_product_policy: MissingProductPolicy,
    /// Cart/checkout behavior for quantities above stock
    pub stock_policy: StockPolicy,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = match self.storage {
            Storage::Postgres(_) => "postgres([REDACTED])",
            Storage::Memory => "memory",
        };
        f.debug_struct("ApiConfig")
            .field("storage", &storage)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("admin_token", &"[REDACTED]")
            .field("media_root", &self.media_root)
            .field("media_url", &self.media_url)
            .field("missing_product_policy", &self.missing_product_policy)
            .field("stock_policy", &self.stock_policy)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the admin token fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage = match get_env_or_default("MINISHOP_STORAGE", "postgres")
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => {
                Storage::Postgres(get_database_url("MINISHOP_DATABASE_URL")?)
            }
            "memory" => Storage::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "MINISHOP_STORAGE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };
        let host = get_env_or_default("MINISHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MINISHOP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MINISHOP_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MINISHOP_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("MINISHOP_BASE_URL", "http://127.0.0.1:8000");
        let admin_token = get_validated_secret("ADMIN_TOKEN")?;
        validate_token_length(&admin_token, "ADMIN_TOKEN")?;

        let media_root = PathBuf::from(get_env_or_default("MINISHOP_MEDIA_ROOT", "media"));
        let media_url = normalize_media_url(&get_env_or_default("MINISHOP_MEDIA_URL", "/media/"));

        let missing_product_policy = parse_env("MINISHOP_MISSING_PRODUCT_POLICY", "skip")?;
        let stock_policy = parse_env("MINISHOP_STOCK_POLICY", "lenient")?;
        let log_format = match get_env_or_default("MINISHOP_LOG_FORMAT", "text").as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            storage,
            host,
            port,
            base_url,
            admin_token,
            media_root,
            media_url,
            missing_product_policy,
            stock_policy,
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

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable; empty counts as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable with `FromStr`, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String>,
{
    get_env_or_default(key, default)
        .parse()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

/// Ensure the media URL prefix starts and ends with `/` (absolute URLs keep their scheme).
fn normalize_media_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if !url.contains("://") && !url.starts_with('/') {
        url.insert(0, '/');
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Validate that a token meets minimum length requirements.
fn validate_token_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
            #[allow(clippy::cast_precision_loss)]
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

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
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
