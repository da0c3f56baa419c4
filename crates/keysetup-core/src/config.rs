//! Remote client configuration
//!
//! Settings are assembled with the builder-style methods. The `ENV_*` names
//! are the environment variables the command line reads them from.

use std::fmt;
use std::time::Duration;

use crate::error::{KeySetupError, Result};
use crate::paging::DEFAULT_PAGE_SIZE;

/// Per-request timeout applied when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// API version requested from the remote system
pub const DEFAULT_API_VERSION: &str = "2";

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_PAGE_SIZE: &str = "API_PAGE_SIZE";
pub const ENV_TIMEOUT_MS: &str = "API_TIMEOUT_MS";

/// Connection settings for the remote query API
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://api.onspring.com`
    pub base_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Items requested per page
    pub page_size: u32,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Value of the `x-api-version` header
    pub api_version: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config with default paging and timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the API version header value
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(KeySetupError::config("base URL is empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(KeySetupError::config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(KeySetupError::config("API key is empty"));
        }
        if self.page_size == 0 {
            return Err(KeySetupError::config("page size must be at least 1"));
        }
        if self.timeout_ms == 0 {
            return Err(KeySetupError::config("timeout must be at least 1 ms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https://api.onspring.com", "key");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.api_version, "2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://localhost:8080", "key")
            .with_page_size(25)
            .with_timeout_ms(500)
            .with_api_version("3");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.api_version, "3");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(ClientConfig::new("", "key").validate().is_err());
        assert!(ClientConfig::new("api.onspring.com", "key").validate().is_err());
        assert!(ClientConfig::new("https://api.onspring.com", " ").validate().is_err());
        assert!(ClientConfig::new("https://api.onspring.com", "key")
            .with_page_size(0)
            .validate()
            .is_err());
        assert!(ClientConfig::new("https://api.onspring.com", "key")
            .with_timeout_ms(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("https://api.onspring.com", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
