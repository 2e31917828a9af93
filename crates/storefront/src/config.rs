//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FITTING_ROOM_API_URL` - Base URL of the catalog and try-on API
//!   (default: `http://localhost:8000`)
//! - `FITTING_ROOM_DATA_DIR` - Directory holding the persisted cart, photo
//!   and gallery (default: `.fitting-room`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Fallback API host when `FITTING_ROOM_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Fallback storage directory when `FITTING_ROOM_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = ".fitting-room";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API host, without a trailing slash
    pub api_base: String,
    /// Directory backing the durable local storage
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_base` is not an absolute http(s) URL.
    pub fn new(api_base: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(api_base, "api_base")?,
            data_dir: data_dir.into(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `FITTING_ROOM_API_URL` is not a valid
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = parse_api_base(
            &get_env_or_default("FITTING_ROOM_API_URL", DEFAULT_API_URL),
            "FITTING_ROOM_API_URL",
        )?;
        let data_dir = PathBuf::from(get_env_or_default("FITTING_ROOM_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self { api_base, data_dir })
    }

    /// Catalog listing endpoint.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.api_base)
    }

    /// Try-on inference endpoint.
    #[must_use]
    pub fn try_on_url(&self) -> String {
        format!("{}/api/try-on", self.api_base)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Validate an API base URL and strip any trailing slash.
fn parse_api_base(raw: &str, var_name: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "URL must have a host".to_string(),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_joined_to_base() {
        let config = ClientConfig::new("http://110.8.186.32:8000/", ".data").unwrap();
        assert_eq!(config.api_base, "http://110.8.186.32:8000");
        assert_eq!(config.products_url(), "http://110.8.186.32:8000/api/products");
        assert_eq!(config.try_on_url(), "http://110.8.186.32:8000/api/try-on");
    }

    #[test]
    fn test_keeps_path_prefix() {
        let config = ClientConfig::new("https://shop.example.com/ai", ".data").unwrap();
        assert_eq!(config.try_on_url(), "https://shop.example.com/ai/api/try-on");
    }

    #[test]
    fn test_rejects_relative_url() {
        let result = ClientConfig::new("localhost:8000/api", ".data");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ClientConfig::new("ftp://example.com", ".data");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_default_url_is_valid() {
        assert!(parse_api_base(DEFAULT_API_URL, "TEST").is_ok());
    }
}
