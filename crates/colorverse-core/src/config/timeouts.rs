//! HTTP timeout configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout configuration for provider HTTP requests
///
/// Generation endpoints are slow; the request timeout defaults to two
/// minutes and should not be set below a minute for image-prompt workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Time allowed to establish a TCP connection, in seconds
    #[serde(default = "TimeoutConfig::default_connection_timeout")]
    pub connection_timeout_secs: u64,
    /// Time allowed for the complete request/response cycle, in seconds
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connection_timeout() -> u64 {
        30
    }

    const fn default_request_timeout() -> u64 {
        120
    }

    /// Create a timeout configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout in seconds
    pub fn with_connection_timeout_secs(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set request timeout in seconds
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Connection timeout as a Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_timeout_secs == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs < self.connection_timeout_secs {
            return Err(
                "Request timeout must be greater than or equal to connection timeout".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: Self::default_connection_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_timeout_allows_slow_generation() {
        let config = TimeoutConfig::default();
        assert!(config.request_timeout() >= Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_inverted_timeouts() {
        let config = TimeoutConfig::new()
            .with_connection_timeout_secs(30)
            .with_request_timeout_secs(10);
        assert!(config.validate().is_err());
    }
}
