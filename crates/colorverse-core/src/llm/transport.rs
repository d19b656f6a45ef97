//! HTTP adapter: provider-neutral request in, normalized completion out
//!
//! The [`CompletionTransport`] trait is the seam between orchestration and
//! the network. Production uses [`HttpTransport`]; tests inject scripted
//! doubles.

use crate::config::{CredentialStore, TimeoutConfig};
use crate::error::{AiError, AiResult};
use crate::llm::converters::RequestConverter;
use crate::llm::messages::{ChatMessage, Completion, CompletionOptions};
use crate::llm::parsers::ResponseParser;
use crate::llm::registry::{AuthScheme, ProviderDescriptor};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// A single attempt against one (provider, model) pair
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Send the request and return the parsed completion, or an error
    /// classified by status code for the retry and fallback layers.
    async fn send(
        &self,
        descriptor: &ProviderDescriptor,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> AiResult<Completion>;
}

/// Reqwest-backed transport used in production
pub struct HttpTransport {
    client: Client,
    credentials: CredentialStore,
}

impl HttpTransport {
    /// Create a transport with the given timeouts and credential store
    pub fn new(timeouts: &TimeoutConfig, credentials: CredentialStore) -> AiResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeouts.connection_timeout())
            .timeout(timeouts.request_timeout())
            .build()
            .map_err(|e| AiError::http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Endpoint URL for a (provider, model) pair
    fn build_url(descriptor: &ProviderDescriptor, model: &str) -> String {
        format!(
            "{}{}",
            descriptor.base_url,
            descriptor.endpoint.replace("{model}", model)
        )
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn send(
        &self,
        descriptor: &ProviderDescriptor,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> AiResult<Completion> {
        let url = Self::build_url(descriptor, model);
        let body = RequestConverter::for_protocol(descriptor.protocol, model, messages, options);

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);

        for (name, value) in descriptor.extra_headers {
            request = request.header(*name, *value);
        }

        // Credentials are resolved at call time, never cached in the descriptor
        let api_key = self.credentials.resolve(descriptor);
        match (&api_key, descriptor.auth) {
            (Some(key), AuthScheme::BearerHeader) => {
                request = request.bearer_auth(key);
            }
            (Some(key), AuthScheme::QueryParam(name)) => {
                request = request.query(&[(name, key.as_str())]);
            }
            (None, _) => {
                if descriptor.requires_auth {
                    return Err(AiError::missing_credential(descriptor.id.name()));
                }
            }
        }

        debug!(
            provider = descriptor.id.name(),
            model,
            url = %url,
            "sending completion request"
        );

        let response = request.send().await.map_err(|e| {
            AiError::http_with_url(
                format!("{} request failed: {}", descriptor.display_name, e),
                url.clone(),
                descriptor.id.name(),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::api(
                descriptor.id.name(),
                status.as_u16(),
                error_text,
            ));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            AiError::parse(
                descriptor.id.name(),
                format!("failed to decode response body: {}", e),
            )
        })?;

        ResponseParser::for_protocol(descriptor.protocol, &response_json, descriptor.id, model)
    }
}
