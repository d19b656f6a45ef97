//! Fallback orchestrator: the completion entry point
//!
//! Walks providers in priority order, models within a provider in selector
//! order, and retries within a model through the retry engine. The first
//! success short-circuits everything; only total exhaustion reaches the
//! caller.

use crate::config::{CredentialStore, RetryConfig, TimeoutConfig};
use crate::error::{AiError, AiResult};
use crate::llm::messages::{ChatMessage, Completion, CompletionOptions};
use crate::llm::registry::{ProviderId, ProviderRegistry};
use crate::llm::retry::RetryEngine;
use crate::llm::selector;
use crate::llm::status::{ProviderStatusSnapshot, ProviderStatusTracker};
use crate::llm::transport::{CompletionTransport, HttpTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Multi-provider completion manager with retry, fallback, and health
/// tracking.
///
/// Shared freely across tasks: `create_completion` takes `&self`, and
/// concurrent calls coordinate only through the status tracker.
#[derive(Debug)]
pub struct AiManager {
    registry: ProviderRegistry,
    priority: Vec<ProviderId>,
    retry_config: RetryConfig,
    credentials: CredentialStore,
    status: ProviderStatusTracker,
    retry: RetryEngine,
}

impl AiManager {
    /// Create a manager over the built-in registry with default settings.
    ///
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new() -> AiResult<Self> {
        Self::builder().build()
    }

    /// Start building a customized manager
    pub fn builder() -> AiManagerBuilder {
        AiManagerBuilder::new()
    }

    /// Request a completion, falling back across providers and models until
    /// one succeeds.
    ///
    /// Providers are filtered up front: one that mandates a credential but
    /// has none configured, or one benched by recent failures, is skipped
    /// entirely. An explicit `options.model` bypasses the selector and is
    /// the only model tried on each provider.
    #[instrument(skip(self, messages, options), fields(messages = messages.len()))]
    pub async fn create_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> AiResult<Completion> {
        let candidates = self.available_providers();
        if candidates.is_empty() {
            return Err(AiError::exhausted(
                "no provider is currently available",
                None,
            ));
        }

        let mut last_error: Option<AiError> = None;

        for id in candidates {
            let Some(descriptor) = self.registry.get(id) else {
                continue;
            };

            let models = match &options.model {
                Some(model) => vec![model.clone()],
                None => selector::select_models(descriptor, &self.status),
            };

            for (index, model) in models.iter().enumerate() {
                if index > 0 {
                    sleep(self.retry_config.model_switch_delay).await;
                }
                debug!(provider = id.name(), model = %model, "attempting model");

                match self
                    .retry
                    .attempt_model(descriptor, model, messages, options)
                    .await
                {
                    Ok(completion) => {
                        self.status.record_success(id, model);
                        info!(
                            provider = id.name(),
                            model = %model,
                            "completion succeeded"
                        );
                        return Ok(completion);
                    }
                    Err(error) => {
                        self.status.record_failure(id);
                        let provider_done = error.exhausts_provider();
                        warn!(
                            provider = id.name(),
                            model = %model,
                            error = %error,
                            "model attempt failed"
                        );
                        last_error = Some(error);

                        if provider_done {
                            warn!(
                                provider = id.name(),
                                "quota or rate limit hit, skipping remaining models"
                            );
                            break;
                        }
                    }
                }
            }
            // Providers are tried back to back; provider_switch_delay stays
            // informational (see DESIGN.md).
        }

        Err(AiError::exhausted(
            "every configured provider failed",
            last_error,
        ))
    }

    /// Diagnostic snapshot of every provider in priority order
    pub fn provider_status(&self) -> Vec<ProviderStatusSnapshot> {
        self.priority
            .iter()
            .map(|id| {
                let configured = self
                    .registry
                    .get(*id)
                    .map(|d| self.credentials.has_credential(d))
                    .unwrap_or(false);
                self.status.snapshot(*id, configured)
            })
            .collect()
    }

    /// Restore every provider's health record to its initial state
    pub fn reset_providers(&self) {
        self.status.reset_all();
        info!("provider statuses reset");
    }

    /// Providers worth trying right now, in priority order
    fn available_providers(&self) -> Vec<ProviderId> {
        self.priority
            .iter()
            .copied()
            .filter(|id| {
                let Some(descriptor) = self.registry.get(*id) else {
                    return false;
                };
                if descriptor.requires_auth && !self.credentials.has_credential(descriptor) {
                    debug!(provider = id.name(), "skipping provider without credential");
                    return false;
                }
                self.status.is_available(*id)
            })
            .collect()
    }
}

/// Builder for [`AiManager`]
pub struct AiManagerBuilder {
    registry: ProviderRegistry,
    priority: Option<Vec<ProviderId>>,
    retry_config: RetryConfig,
    timeouts: TimeoutConfig,
    credentials: CredentialStore,
    transport: Option<Arc<dyn CompletionTransport>>,
    failure_threshold: Option<u32>,
    recovery_window: Option<Duration>,
}

impl AiManagerBuilder {
    /// Start from the built-in registry and default configuration
    pub fn new() -> Self {
        Self {
            registry: ProviderRegistry::builtin(),
            priority: None,
            retry_config: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            credentials: CredentialStore::new(),
            transport: None,
            failure_threshold: None,
            recovery_window: None,
        }
    }

    /// Use a custom provider registry
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Override the provider fallback order
    pub fn with_priority(mut self, priority: Vec<ProviderId>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Override retry and pacing behavior
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Override HTTP timeouts
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set an explicit API key for a provider, bypassing its env var
    pub fn with_api_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.credentials.set(provider, key);
        self
    }

    /// Inject a custom transport (used by tests)
    pub fn with_transport(mut self, transport: Arc<dyn CompletionTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the consecutive-failure threshold
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = Some(threshold);
        self
    }

    /// Override the availability recovery window
    pub fn with_recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = Some(window);
        self
    }

    /// Build the manager
    pub fn build(self) -> AiResult<AiManager> {
        self.retry_config
            .validate()
            .map_err(|e| AiError::config_with_context(e, "validating retry configuration"))?;
        self.timeouts
            .validate()
            .map_err(|e| AiError::config_with_context(e, "validating timeout configuration"))?;

        let priority = match self.priority {
            Some(priority) => {
                for id in &priority {
                    if self.registry.get(*id).is_none() {
                        return Err(AiError::config(format!(
                            "provider '{}' in priority order is not in the registry",
                            id
                        )));
                    }
                }
                priority
            }
            None => self.registry.priority_order(),
        };

        let transport: Arc<dyn CompletionTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.timeouts, self.credentials.clone())?),
        };

        let mut status = ProviderStatusTracker::new();
        if let Some(threshold) = self.failure_threshold {
            status = status.with_failure_threshold(threshold);
        }
        if let Some(window) = self.recovery_window {
            status = status.with_recovery_window(window);
        }

        let retry = RetryEngine::new(self.retry_config.clone(), transport);

        Ok(AiManager {
            registry: self.registry,
            priority,
            retry_config: self.retry_config,
            credentials: self.credentials,
            status,
            retry,
        })
    }
}

impl Default for AiManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
