//! Coding service client configuration.
//!
//! One base URL for the whole service, an optional bearer token, and two
//! timeouts: a short one for JSON calls and a long one for file uploads and
//! PDF renders.

use url::Url;
use zeroize::Zeroizing;

/// Base URL used when `CLAIMFLOW_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for connecting to the coding service.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Service base URL. Always ends with `/`.
    pub base_url: Url,
    /// Optional bearer token sent on every request.
    pub api_token: Option<Zeroizing<String>>,
    /// Timeout for JSON calls, in seconds.
    pub timeout_secs: u64,
    /// Timeout for file uploads and PDF renders, in seconds.
    pub transfer_timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("transfer_timeout_secs", &self.transfer_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Default configuration against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            api_token: None,
            timeout_secs: 30,
            transfer_timeout_secs: 120,
        }
    }

    /// Parse `raw` as the base URL.
    pub fn for_url(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
        Ok(Self::new(url))
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CLAIMFLOW_API_URL` (default: `http://localhost:8000`)
    /// - `CLAIMFLOW_API_TOKEN` (optional)
    /// - `CLAIMFLOW_TIMEOUT_SECS` (default: 30)
    /// - `CLAIMFLOW_TRANSFER_TIMEOUT_SECS` (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(env_url("CLAIMFLOW_API_URL", DEFAULT_API_URL)?);
        config.api_token = std::env::var("CLAIMFLOW_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Zeroizing::new);
        config.timeout_secs = env_secs("CLAIMFLOW_TIMEOUT_SECS", 30);
        config.transfer_timeout_secs = env_secs("CLAIMFLOW_TRANSFER_TIMEOUT_SECS", 120);
        Ok(config)
    }

    /// Configuration pointing to a local mock server (for testing).
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let mut config = Self::for_url(&format!("http://127.0.0.1:{port}"))?;
        config.timeout_secs = 5;
        config.transfer_timeout_secs = 5;
        Ok(config)
    }

    /// Replace the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_secs(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(default)
}

// Endpoint paths are appended to the base, so a base with a path prefix
// must end in `/` to keep that prefix.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = ClientConfig::local_mock(9000).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.timeout_secs, 5);
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let cfg = ClientConfig::for_url("https://billing.example.com/coding").unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://billing.example.com/coding/");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ClientConfig::local_mock(9000).unwrap().with_token("s3cret");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("CLAIMFLOW_NONEXISTENT_VAR_12345", DEFAULT_API_URL).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("CLAIMFLOW_TEST_BAD_URL", "not a url");
        let result = env_url("CLAIMFLOW_TEST_BAD_URL", DEFAULT_API_URL);
        std::env::remove_var("CLAIMFLOW_TEST_BAD_URL");
        assert!(result.is_err());
    }

    #[test]
    fn env_secs_ignores_zero_and_garbage() {
        std::env::set_var("CLAIMFLOW_TEST_SECS_ZERO", "0");
        std::env::set_var("CLAIMFLOW_TEST_SECS_BAD", "soon");
        assert_eq!(env_secs("CLAIMFLOW_TEST_SECS_ZERO", 30), 30);
        assert_eq!(env_secs("CLAIMFLOW_TEST_SECS_BAD", 30), 30);
        std::env::remove_var("CLAIMFLOW_TEST_SECS_ZERO");
        std::env::remove_var("CLAIMFLOW_TEST_SECS_BAD");
    }
}
