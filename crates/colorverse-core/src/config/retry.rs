//! Retry and fallback pacing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry behavior for a single (provider, model) pair plus the pacing
/// between fallback steps.
///
/// The backoff table is positional: attempt `n` sleeps `backoff_delays[n]`
/// before attempt `n + 1`, and the last entry repeats once the table runs
/// out. Callers inject a custom config at manager construction; tests use
/// zero delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per model (not per provider)
    pub max_retries: u32,
    /// Delays between attempts on the same model; last entry repeats
    pub backoff_delays: Vec<Duration>,
    /// Pause before trying the next model of the same provider
    #[serde(with = "humantime_serde")]
    pub model_switch_delay: Duration,
    /// Documented pause between providers. Informational only: the
    /// orchestrator moves to the next provider without waiting, matching
    /// the observed reference behavior (see DESIGN.md).
    #[serde(with = "humantime_serde")]
    pub provider_switch_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_delays: vec![
                Duration::from_secs(10),
                Duration::from_secs(30),
                Duration::from_secs(60),
            ],
            model_switch_delay: Duration::from_secs(2),
            provider_switch_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Create a retry config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts per model
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff delay table
    pub fn with_backoff_delays(mut self, delays: Vec<Duration>) -> Self {
        self.backoff_delays = delays;
        self
    }

    /// Set the pause between models of the same provider
    pub fn with_model_switch_delay(mut self, delay: Duration) -> Self {
        self.model_switch_delay = delay;
        self
    }

    /// Backoff duration before the attempt following `attempt` (0-based).
    /// Attempts past the end of the table reuse the last configured delay.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_delays
            .get(attempt as usize)
            .or_else(|| self.backoff_delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.backoff_delays.is_empty() {
            return Err("backoff_delays must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_schedule() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_for_attempt(0), Duration::from_secs(10));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_secs(30));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_secs(60));
        assert_eq!(config.model_switch_delay, Duration::from_secs(2));
    }

    #[test]
    fn last_backoff_entry_repeats() {
        let config = RetryConfig::new().with_backoff_delays(vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
        ]);
        assert_eq!(config.backoff_for_attempt(5), Duration::from_millis(20));
    }

    #[test]
    fn validation_rejects_empty_table() {
        let config = RetryConfig::new().with_backoff_delays(Vec::new());
        assert!(config.validate().is_err());
        assert!(RetryConfig::new().with_max_retries(0).validate().is_err());
        assert!(RetryConfig::default().validate().is_ok());
    }
}
