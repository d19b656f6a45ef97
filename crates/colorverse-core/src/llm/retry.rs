//! Bounded retry with backoff for a single (provider, model) pair

use crate::config::RetryConfig;
use crate::error::{AiError, AiResult};
use crate::llm::messages::{ChatMessage, Completion, CompletionOptions};
use crate::llm::registry::ProviderDescriptor;
use crate::llm::transport::CompletionTransport;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

/// Retry engine: drives transport attempts for one model at a time.
///
/// Errors classified as terminal (401, 429, 403, missing credential) abort
/// immediately; transient failures sleep through the configured backoff
/// table before the next attempt. Sleeps are cooperative, so concurrent
/// completions are never serialized behind one another.
pub struct RetryEngine {
    config: RetryConfig,
    transport: Arc<dyn CompletionTransport>,
}

impl std::fmt::Debug for RetryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RetryEngine {
    /// Create a retry engine over a transport
    pub fn new(config: RetryConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        Self { config, transport }
    }

    /// Attempt a single model with bounded retries and backoff
    pub async fn attempt_model(
        &self,
        descriptor: &ProviderDescriptor,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> AiResult<Completion> {
        let mut last_error = None;

        for attempt in 0..self.config.max_retries {
            match self
                .transport
                .send(descriptor, model, messages, options)
                .await
            {
                Ok(completion) => {
                    if attempt > 0 {
                        info!(
                            provider = descriptor.id.name(),
                            model,
                            attempt,
                            "request succeeded after retry"
                        );
                    }
                    return Ok(completion);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        warn!(
                            provider = descriptor.id.name(),
                            model,
                            error = %error,
                            "non-retryable error, abandoning model"
                        );
                        return Err(error);
                    }

                    if attempt + 1 < self.config.max_retries {
                        let delay = self.config.backoff_for_attempt(attempt);
                        warn!(
                            provider = descriptor.id.name(),
                            model,
                            attempt = attempt + 1,
                            max_attempts = self.config.max_retries,
                            delay_secs = delay.as_secs_f64(),
                            error = %error,
                            "transient failure, backing off before retry"
                        );
                        last_error = Some(error);
                        sleep(delay).await;
                    } else {
                        warn!(
                            provider = descriptor.id.name(),
                            model,
                            attempts = self.config.max_retries,
                            "all retry attempts exhausted"
                        );
                        last_error = Some(error);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AiError::other(format!(
                "all {} attempts failed without error details",
                self.config.max_retries
            ))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::registry::{AuthScheme, ProviderId, WireProtocol};
    use crate::llm::messages::TokenUsage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
        id: ProviderId::Pollinations,
        display_name: "Test",
        base_url: "http://localhost",
        endpoint: "/openai",
        models: &["alpha"],
        protocol: WireProtocol::OpenAiChat,
        requires_auth: false,
        auth: AuthScheme::BearerHeader,
        extra_headers: &[],
        api_key_env: "COLORVERSE_RETRY_TEST_KEY",
    };

    /// Fails `failures` times with `status`, then succeeds
    struct FlakyTransport {
        failures: u32,
        status: u16,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl CompletionTransport for FlakyTransport {
        async fn send(
            &self,
            descriptor: &ProviderDescriptor,
            model: &str,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> AiResult<Completion> {
            let mut calls = self.calls.lock();
            *calls += 1;
            if *calls <= self.failures {
                Err(AiError::api(descriptor.id.name(), self.status, "scripted"))
            } else {
                Ok(Completion {
                    content: "ok".to_string(),
                    model: model.to_string(),
                    provider: descriptor.id,
                    usage: TokenUsage::default(),
                })
            }
        }
    }

    fn fast_config() -> RetryConfig {
        RetryConfig::new().with_backoff_delays(vec![Duration::ZERO])
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let transport = Arc::new(FlakyTransport {
            failures: 2,
            status: 503,
            calls: Mutex::new(0),
        });
        let engine = RetryEngine::new(fast_config(), transport.clone());

        let result = engine
            .attempt_model(&DESCRIPTOR, "alpha", &[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;
        assert_eq!(result.unwrap().content, "ok");
        assert_eq!(*transport.calls.lock(), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_on_persistent_server_errors() {
        let transport = Arc::new(FlakyTransport {
            failures: u32::MAX,
            status: 500,
            calls: Mutex::new(0),
        });
        let engine = RetryEngine::new(fast_config(), transport.clone());

        let result = engine
            .attempt_model(&DESCRIPTOR, "alpha", &[], &CompletionOptions::default())
            .await;
        assert!(result.is_err());
        assert_eq!(*transport.calls.lock(), 3, "default max_retries");
    }

    #[tokio::test]
    async fn terminal_errors_short_circuit() {
        for status in [401, 429, 403] {
            let transport = Arc::new(FlakyTransport {
                failures: u32::MAX,
                status,
                calls: Mutex::new(0),
            });
            let engine = RetryEngine::new(fast_config(), transport.clone());

            let result = engine
                .attempt_model(&DESCRIPTOR, "alpha", &[], &CompletionOptions::default())
                .await;
            assert!(result.is_err());
            assert_eq!(
                *transport.calls.lock(),
                1,
                "status {} must not be retried",
                status
            );
        }
    }
}
