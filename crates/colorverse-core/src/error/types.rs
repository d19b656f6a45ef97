//! Core error types for the ColorVerse AI core

use thiserror::Error;

/// Result type alias for AI core operations
pub type AiResult<T> = Result<T, AiError>;

/// Main error type for the completion pipeline
///
/// Variants carry enough structure (provider id, HTTP status) for the retry
/// and fallback layers to classify failures without string matching.
#[derive(Error, Debug, Clone)]
pub enum AiError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// A provider that mandates authentication was called without a credential
    #[error("Missing API key for provider '{provider}'")]
    MissingCredential { provider: String },

    /// Non-2xx response from a provider endpoint
    #[error("API error from '{provider}' (status {status_code}): {message}")]
    Api {
        provider: String,
        status_code: u16,
        message: String,
    },

    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        provider: Option<String>,
    },

    /// Response body did not match the provider's wire shape
    #[error("Parse error from '{provider}': {message}")]
    Parse { provider: String, message: String },

    /// Every provider, model, and retry was exhausted
    #[error("All providers exhausted: {message}")]
    Exhausted {
        message: String,
        #[source]
        source: Option<Box<AiError>>,
    },

    /// Generic error
    #[error("Error: {message}")]
    Other { message: String },
}
