//! Application configuration
//!
//! Loaded from an optional YAML file, then overridden by the
//! `INVOICE_API_URL` environment variable and command-line flags.
//!
//! ```yaml
//! api_url: http://localhost:3001
//! resource: /invoices
//! page_size: 10
//! timeout_ms: 5000
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "INVOICE_API_URL";

// ============================================================================
// App Config
// ============================================================================

/// Settings for talking to the invoices API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the API (e.g., "http://localhost:3001")
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Collection path relative to the base URL
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Page size used when the location does not specify one
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in milliseconds; none when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_api_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_resource() -> String {
    "/invoices".to_string()
}

fn default_page_size() -> u32 {
    crate::pagination::DEFAULT_PAGE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            resource: default_resource(),
            page_size: default_page_size(),
            timeout_ms: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `INVOICE_API_URL` if it is set and non-empty
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        let url = std::env::var(API_URL_ENV).ok();
        self.with_api_url_override(url)
    }

    /// Replace the API URL when an override is given
    #[must_use]
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.resource.trim().is_empty() {
            return Err(Error::invalid_value("resource", "must not be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        Ok(())
    }

    /// HTTP client settings derived from this configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().base_url(self.api_url.as_str());
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder.build()
    }

    /// Build the HTTP client for this configuration
    pub fn http_client(&self) -> Result<HttpClient> {
        self.validate()?;
        HttpClient::with_config(self.http_config())
    }
}
