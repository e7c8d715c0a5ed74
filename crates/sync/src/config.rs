//! Mailchimp configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAILCHIMP_API_KEY` - Mailchimp API key (`<key>-<dc>`)
//! - `MAILCHIMP_STORE_ID` - Id of the e-commerce store the entities belong to
//!
//! ## Optional
//! - `MAILCHIMP_API_URL` - API root override (default: `https://<dc>.api.mailchimp.com/3.0`)
//! - `MAILCHIMP_SYNC_ENABLED` - Set to `false` to make automatic syncs no-ops (default: true)
//! - `MAILCHIMP_TIMEOUT_SECS` - Request timeout (default: 30)

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "replace", "placeholder", "xxx"];

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

/// Mailchimp API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MailchimpConfig {
    /// Mailchimp API key
    pub api_key: SecretString,
    /// E-commerce store id
    pub store_id: String,
    /// API root, e.g. `https://us6.api.mailchimp.com/3.0`
    pub api_url: String,
    /// Whether automatic syncs run at all
    pub enabled: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MailchimpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailchimpConfig")
            .field("api_key", &"[REDACTED]")
            .field("store_id", &self.store_id)
            .field("api_url", &self.api_url)
            .field("enabled", &self.enabled)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MailchimpConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = get_required_env("MAILCHIMP_API_KEY")?;
        reject_placeholder(&api_key, "MAILCHIMP_API_KEY")?;
        let store_id = get_required_env("MAILCHIMP_STORE_ID")?;

        let api_url = match get_optional_env("MAILCHIMP_API_URL") {
            Some(url) => validate_api_url(&url)?,
            None => default_api_url(&api_key)?,
        };

        let enabled = parse_bool(
            "MAILCHIMP_SYNC_ENABLED",
            &get_env_or_default("MAILCHIMP_SYNC_ENABLED", "true"),
        )?;
        let timeout_secs = get_env_or_default(
            "MAILCHIMP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MAILCHIMP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            store_id,
            api_url,
            enabled,
            timeout_secs,
        })
    }

    /// Build a configuration directly, e.g. for tests against a mock server.
    #[must_use]
    pub fn new(
        api_key: SecretString,
        store_id: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            store_id: store_id.into(),
            api_url: api_url.into(),
            enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Root URL of the store's e-commerce resources.
    #[must_use]
    pub fn store_url(&self) -> String {
        format!(
            "{}/ecommerce/stores/{}",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.store_id)
        )
    }

    /// The data center encoded in the API key, if any.
    #[must_use]
    pub fn data_center(&self) -> Option<&str> {
        data_center(self.api_key.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extract the `<dc>` suffix from a `<key>-<dc>` API key.
fn data_center(api_key: &str) -> Option<&str> {
    api_key
        .rsplit_once('-')
        .map(|(_, dc)| dc)
        .filter(|dc| !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn default_api_url(api_key: &str) -> Result<String, ConfigError> {
    let dc = data_center(api_key).ok_or_else(|| {
        ConfigError::InvalidEnvVar(
            "MAILCHIMP_API_KEY".to_string(),
            "missing data center suffix (expected <key>-<dc>)".to_string(),
        )
    })?;
    Ok(format!("https://{dc}.api.mailchimp.com/3.0"))
}

fn validate_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("MAILCHIMP_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "MAILCHIMP_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }
    Ok(())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
