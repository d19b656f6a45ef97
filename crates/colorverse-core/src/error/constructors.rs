//! Constructor methods for AiError

use super::types::AiError;

impl AiError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a missing-credential error
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    /// Create an API error from a provider status code
    pub fn api(provider: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            provider: None,
        }
    }

    /// Create a transport error with the request URL and provider
    pub fn http_with_url(
        message: impl Into<String>,
        url: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self::Http {
            message: message.into(),
            url: Some(url.into()),
            provider: Some(provider.into()),
        }
    }

    /// Create a parse error for a provider response
    pub fn parse(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an exhaustion error wrapping the most recent underlying cause
    pub fn exhausted(message: impl Into<String>, source: Option<AiError>) -> Self {
        Self::Exhausted {
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
