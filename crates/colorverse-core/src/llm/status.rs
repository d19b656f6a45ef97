//! Per-provider health tracking
//!
//! One mutable record per provider for the lifetime of the process:
//! availability, consecutive failures, success counts per model. Shared by
//! every in-flight completion; updates are last-write-wins behind a single
//! lock, and a slightly stale read costs at most one doomed attempt.

use crate::llm::registry::ProviderId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
const DEFAULT_RECOVERY_WINDOW: Duration = Duration::from_secs(600);

/// Mutable health record for one provider
#[derive(Debug, Clone)]
struct ProviderHealth {
    available: bool,
    consecutive_failures: u32,
    last_success: Option<Instant>,
    last_failure: Option<Instant>,
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
    model_success_counts: HashMap<String, u32>,
}

impl ProviderHealth {
    fn new() -> Self {
        Self {
            available: true,
            consecutive_failures: 0,
            last_success: None,
            last_failure: None,
            last_success_at: None,
            last_failure_at: None,
            model_success_counts: HashMap::new(),
        }
    }
}

/// Read-only view of one provider's health for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatusSnapshot {
    pub provider: ProviderId,
    pub available: bool,
    pub api_key_configured: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

/// Tracks availability and per-model success history for every provider
#[derive(Debug)]
pub struct ProviderStatusTracker {
    entries: RwLock<HashMap<ProviderId, ProviderHealth>>,
    failure_threshold: u32,
    recovery_window: Duration,
}

impl ProviderStatusTracker {
    /// Create a tracker with the default threshold (3) and window (10 min)
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            recovery_window: DEFAULT_RECOVERY_WINDOW,
        }
    }

    /// Set the consecutive-failure count that marks a provider unavailable
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set how long an unavailable provider stays benched
    pub fn with_recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = window;
        self
    }

    /// Whether the provider should be tried right now
    pub fn is_available(&self, provider: ProviderId) -> bool {
        self.is_available_at(provider, Instant::now())
    }

    /// Availability check with lazy recovery: a provider benched by failures
    /// flips back to available in place once the recovery window has elapsed
    /// since its last failure.
    pub fn is_available_at(&self, provider: ProviderId, now: Instant) -> bool {
        let mut entries = self.entries.write();
        let entry = entries.entry(provider).or_insert_with(ProviderHealth::new);

        if entry.available {
            return true;
        }
        match entry.last_failure {
            Some(at) if now.saturating_duration_since(at) > self.recovery_window => {
                entry.available = true;
                entry.consecutive_failures = 0;
                true
            }
            _ => false,
        }
    }

    /// Record a successful completion for (provider, model)
    pub fn record_success(&self, provider: ProviderId, model: &str) {
        let mut entries = self.entries.write();
        let entry = entries.entry(provider).or_insert_with(ProviderHealth::new);

        entry.available = true;
        entry.consecutive_failures = 0;
        entry.last_success = Some(Instant::now());
        entry.last_success_at = Some(Utc::now());
        *entry
            .model_success_counts
            .entry(model.to_string())
            .or_insert(0) += 1;
    }

    /// Record a failed model attempt for a provider
    pub fn record_failure(&self, provider: ProviderId) {
        let mut entries = self.entries.write();
        let entry = entries.entry(provider).or_insert_with(ProviderHealth::new);

        entry.consecutive_failures += 1;
        entry.last_failure = Some(Instant::now());
        entry.last_failure_at = Some(Utc::now());
        if entry.consecutive_failures >= self.failure_threshold {
            entry.available = false;
        }
    }

    /// Restore one provider to its initial state
    pub fn reset(&self, provider: ProviderId) {
        self.entries.write().insert(provider, ProviderHealth::new());
    }

    /// Restore every provider to its initial state
    pub fn reset_all(&self) {
        self.entries.write().clear();
    }

    /// Success counts per model for a provider (empty until first success)
    pub fn model_success_counts(&self, provider: ProviderId) -> HashMap<String, u32> {
        self.entries
            .read()
            .get(&provider)
            .map(|entry| entry.model_success_counts.clone())
            .unwrap_or_default()
    }

    /// Read-only snapshot for diagnostics; does not trigger lazy recovery,
    /// but reports a provider whose window has elapsed as available.
    pub fn snapshot(&self, provider: ProviderId, api_key_configured: bool) -> ProviderStatusSnapshot {
        let entries = self.entries.read();
        match entries.get(&provider) {
            Some(entry) => {
                let recovered = !entry.available
                    && entry.last_failure.is_some_and(|at| {
                        Instant::now().saturating_duration_since(at) > self.recovery_window
                    });
                ProviderStatusSnapshot {
                    provider,
                    available: entry.available || recovered,
                    api_key_configured,
                    last_success_at: entry.last_success_at,
                    last_failure_at: entry.last_failure_at,
                    consecutive_failures: entry.consecutive_failures,
                }
            }
            None => ProviderStatusSnapshot {
                provider,
                available: true,
                api_key_configured,
                last_success_at: None,
                last_failure_at: None,
                consecutive_failures: 0,
            },
        }
    }
}

impl Default for ProviderStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
