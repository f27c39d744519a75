//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_DATA_DIR` - Directory for the file-backed store (default: `.scooter-shop`)
//! - `STOREFRONT_ALLOWED_DOMAINS` - Comma-separated email domains accepted for
//!   registration and login (default: `duocuc.cl,duoc.cl,gmail.com`)
//! - `STOREFRONT_AUTO_LOGIN_AFTER_REGISTER` - Start a session right after
//!   registering (default: `true`)
//! - `STOREFRONT_PARTIALS_DIR` - Site root that fragment paths are resolved
//!   against (default: `.`)
//! - `STOREFRONT_PARTIALS_URL` - Fetch fragments over HTTP from this base URL
//!   instead of the filesystem
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default email domains accepted by the auth store.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["duocuc.cl", "duoc.cl", "gmail.com"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Email domains accepted for registration and login (lower-case)
    pub allowed_domains: Vec<String>,
    /// Whether registration also logs the new user in
    pub auto_login_after_register: bool,
    /// Where navbar/footer fragments come from
    pub partials: PartialsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Fragment source configuration.
#[derive(Debug, Clone)]
pub struct PartialsConfig {
    /// Site root on disk
    pub dir: PathBuf,
    /// HTTP base URL; takes precedence over `dir` when set
    pub base_url: Option<Url>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".scooter-shop"),
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|d| (*d).to_owned())
                .collect(),
            auto_login_after_register: true,
            partials: PartialsConfig {
                dir: PathBuf::from("."),
                base_url: None,
            },
            sentry_dsn: None,
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
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let data_dir = get_optional_env("STOREFRONT_DATA_DIR")
            .map_or(defaults.data_dir, PathBuf::from);

        let allowed_domains = match get_optional_env("STOREFRONT_ALLOWED_DOMAINS") {
            Some(raw) => parse_domains(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_ALLOWED_DOMAINS".to_string(), e))?,
            None => defaults.allowed_domains,
        };

        let auto_login_after_register =
            match get_optional_env("STOREFRONT_AUTO_LOGIN_AFTER_REGISTER") {
                Some(raw) => parse_bool(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_AUTO_LOGIN_AFTER_REGISTER".to_string(), e)
                })?,
                None => defaults.auto_login_after_register,
            };

        let base_url = get_optional_env("STOREFRONT_PARTIALS_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_PARTIALS_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let partials = PartialsConfig {
            dir: get_optional_env("STOREFRONT_PARTIALS_DIR")
                .map_or(defaults.partials.dir, PathBuf::from),
            base_url,
        };

        Ok(Self {
            data_dir,
            allowed_domains,
            auto_login_after_register,
            partials,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional, non-blank environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a comma-separated domain list.
fn parse_domains(raw: &str) -> Result<Vec<String>, String> {
    let domains: Vec<String> = raw
        .split(',')
        .map(|d| d.trim().trim_start_matches('@').to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();

    if domains.is_empty() {
        return Err("at least one domain is required".to_string());
    }
    if let Some(bad) = domains.iter().find(|d| d.contains('@') || !d.contains('.')) {
        return Err(format!("'{bad}' is not a domain"));
    }
    Ok(domains)
}

/// Parse a boolean flag.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected true/false, got '{other}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.allowed_domains, vec!["duocuc.cl", "duoc.cl", "gmail.com"]);
        assert!(config.auto_login_after_register);
        assert!(config.partials.base_url.is_none());
    }

    #[test]
    fn test_parse_domains() {
        assert_eq!(
            parse_domains(" @Gmail.com, duoc.cl ,").unwrap(),
            vec!["gmail.com", "duoc.cl"]
        );
        assert!(parse_domains(" , ").is_err());
        assert!(parse_domains("localhost").is_err());
        assert!(parse_domains("a@b.com").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
