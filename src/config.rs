use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CarrierError, Result};

pub const DEFAULT_API_URL: &str = "https://urgentcargus.azure-api.net/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(120_000);

const SUBSCRIPTION_KEY_VAR: &str = "CARGUS_SUBSCRIPTION_KEY";
const API_URL_VAR: &str = "CARGUS_API_URL";
const OUTPUT_DIR_VAR: &str = "CARGUS_OUTPUT_DIR";

/// API subscription key, sent as `Ocp-Apim-Subscription-Key` on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct SubscriptionKey(String);

impl SubscriptionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubscriptionKey(<redacted>)")
    }
}

/// Configuration for [`crate::CarrierClient`]
#[derive(Debug, Clone)]
pub struct CarrierConfig {
    /// API origin, without a trailing slash
    pub base_url: String,
    pub subscription_key: SubscriptionKey,
    /// Applied to every request
    pub timeout: Duration,
    /// Directory label PDFs are written to. Empty means the working directory.
    pub output_dir: PathBuf,
}

impl CarrierConfig {
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            subscription_key: SubscriptionKey::new(subscription_key),
            timeout: REQUEST_TIMEOUT,
            output_dir: PathBuf::new(),
        }
    }

    /// Load from `CARGUS_SUBSCRIPTION_KEY`, with optional `CARGUS_API_URL`
    /// and `CARGUS_OUTPUT_DIR` overrides.
    pub fn from_env() -> Result<Self> {
        let key = env::var(SUBSCRIPTION_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CarrierError::InvalidConfig(format!("{} is not set", SUBSCRIPTION_KEY_VAR))
            })?;

        let mut config = Self::new(key.trim());
        if let Ok(url) = env::var(API_URL_VAR)
            && !url.trim().is_empty()
        {
            config = config.with_base_url(url.trim());
        }
        if let Ok(dir) = env::var(OUTPUT_DIR_VAR) {
            config = config.with_output_dir(dir);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Full URL of an endpoint path such as `/Counties`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarrierConfig::new("key-123");
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.output_dir, PathBuf::new());
        assert_eq!(config.subscription_key.as_str(), "key-123");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = CarrierConfig::new("k").with_base_url("http://127.0.0.1:8080/api/");
        assert_eq!(config.endpoint("/Counties"), "http://127.0.0.1:8080/api/Counties");
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let config = CarrierConfig::new("very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
