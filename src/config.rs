//! Adapter configuration
//!
//! Every default the remote API calls depend on (endpoint host, API key
//! header, request timeout, viewport size) lives in [`AdapterConfig`] and is
//! passed explicitly to the adapter.

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://pdfmunk.com";

/// Header carrying the API key on every request
pub const DEFAULT_API_KEY_HEADER: &str = "CLIENT-API-KEY";

/// Configuration for talking to the remote PDF API
#[derive(Clone)]
pub struct AdapterConfig {
    /// Base URL all endpoint paths are joined onto (default: https://pdfmunk.com)
    pub base_url: Url,
    /// API key sent in `api_key_header`
    pub api_key: String,
    /// Header name for the API key (default: CLIENT-API-KEY)
    pub api_key_header: String,
    /// Request timeout in seconds (default: 300)
    pub timeout_secs: u64,
    /// Viewport width used by PDF generation when not given (default: 1080)
    pub default_viewport_width: u32,
    /// Viewport height used by PDF generation when not given (default: 720)
    pub default_viewport_height: u32,
    /// Maximum response body size in bytes (default: 100MB)
    pub max_response_bytes: u64,
    /// Turn status >= 400 responses into errors instead of status records (default: false)
    pub fail_on_http_error: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: String::new(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            timeout_secs: 300,
            default_viewport_width: 1080,
            default_viewport_height: 720,
            max_response_bytes: 100 * 1024 * 1024, // 100MB
            fail_on_http_error: false,
        }
    }
}

// The API key never reaches logs.
impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_key_header", &self.api_key_header)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_viewport_width", &self.default_viewport_width)
            .field("default_viewport_height", &self.default_viewport_height)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("fail_on_http_error", &self.fail_on_http_error)
            .finish()
    }
}

impl AdapterConfig {
    /// Create a configuration with the given API key and defaults for everything else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from `PDF_API_*` environment variables.
    ///
    /// - `PDF_API_KEY` (required)
    /// - `PDF_API_BASE_URL`
    /// - `PDF_API_TIMEOUT_SECS`
    /// - `PDF_API_MAX_RESPONSE_BYTES`
    /// - `PDF_API_FAIL_ON_HTTP_ERROR` (`true`/`1`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("PDF_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Configuration {
                reason: "PDF_API_KEY is not set".to_string(),
            })?;

        if let Some(base_url) = lookup("PDF_API_BASE_URL") {
            config.base_url = Url::parse(&base_url)?;
        }

        if let Some(timeout) = lookup("PDF_API_TIMEOUT_SECS") {
            config.timeout_secs = parse_number("PDF_API_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(max) = lookup("PDF_API_MAX_RESPONSE_BYTES") {
            config.max_response_bytes = parse_number("PDF_API_MAX_RESPONSE_BYTES", &max)?;
        }

        if let Some(flag) = lookup("PDF_API_FAIL_ON_HTTP_ERROR") {
            config.fail_on_http_error = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that would otherwise surface as confusing request failures
    pub fn validate(&self) -> Result<()> {
        if self.api_key_header.trim().is_empty() {
            return Err(Error::Configuration {
                reason: "API key header name is empty".to_string(),
            });
        }
        if self.base_url.cannot_be_a_base() {
            return Err(Error::Configuration {
                reason: format!("{} cannot be used as a base URL", self.base_url),
            });
        }
        if self.max_response_bytes == 0 {
            return Err(Error::Configuration {
                reason: "max_response_bytes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Timeout applied to requests that don't carry their own
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an endpoint path such as `/api/v1/pdf/merge`.
    /// A path prefix on `base_url` (e.g. `https://gateway/pdfmunk`) is kept.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let prefix = format!("{}/", base.path());
            base.set_path(&prefix);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::Configuration {
        reason: format!("{} must be a number, got {:?}", name, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.base_url.as_str(), "https://pdfmunk.com/");
        assert_eq!(config.api_key_header, "CLIENT-API-KEY");
        assert_eq!(config.timeout(), Duration::from_millis(300_000));
        assert_eq!(config.default_viewport_width, 1080);
        assert_eq!(config.default_viewport_height, 720);
        assert!(!config.fail_on_http_error);
    }

    #[test]
    fn test_endpoint_join() {
        let config = AdapterConfig::default();
        let url = config.endpoint("/api/v1/pdf/merge").unwrap();
        assert_eq!(url.as_str(), "https://pdfmunk.com/api/v1/pdf/merge");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let mut config = AdapterConfig::default();
        for base in ["https://gateway.example.com/pdfmunk", "https://gateway.example.com/pdfmunk/"] {
            config.base_url = Url::parse(base).unwrap();
            let url = config.endpoint("/api/v1/pdf/merge").unwrap();
            assert_eq!(
                url.as_str(),
                "https://gateway.example.com/pdfmunk/api/v1/pdf/merge"
            );
        }
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let result = AdapterConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(Error::Configuration { .. })));

        let result = AdapterConfig::from_lookup(lookup(&[("PDF_API_KEY", "  ")]));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AdapterConfig::from_lookup(lookup(&[
            ("PDF_API_KEY", "secret"),
            ("PDF_API_BASE_URL", "http://localhost:8080"),
            ("PDF_API_TIMEOUT_SECS", "30"),
            ("PDF_API_MAX_RESPONSE_BYTES", "1024"),
            ("PDF_API_FAIL_ON_HTTP_ERROR", "true"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_response_bytes, 1024);
        assert!(config.fail_on_http_error);
    }

    #[test]
    fn test_from_lookup_bad_number() {
        let result = AdapterConfig::from_lookup(lookup(&[
            ("PDF_API_KEY", "secret"),
            ("PDF_API_TIMEOUT_SECS", "five"),
        ]));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AdapterConfig::with_api_key("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
