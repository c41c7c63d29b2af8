//! Client configuration
//!
//! The service location is fixed at build time in practice; `ClientConfig`
//! keeps it in one place together with the two request timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_VALIDATE_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service origin without trailing slash, e.g. `http://localhost:5000`
    pub base_url: String,
    pub health_timeout_ms: u64,
    pub validate_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            validate_timeout_ms: DEFAULT_VALIDATE_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Config for a service at `base_url` with the default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            ..Self::default()
        })
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_validate_timeout(mut self, timeout: Duration) -> Self {
        self.validate_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_millis(self.validate_timeout_ms)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    pub fn validate_url(&self) -> String {
        format!("{}/api/validate", self.base_url)
    }
}
