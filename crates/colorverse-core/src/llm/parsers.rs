//! Response parsing for each wire protocol
//!
//! Counterpart to `converters`: pure functions from provider JSON to the
//! normalized [`Completion`]. The resolved model and provider come from the
//! call context, never from the response body, since not every provider
//! echoes them back.

use crate::error::{AiError, AiResult};
use crate::llm::messages::{Completion, TokenUsage};
use crate::llm::registry::{ProviderId, WireProtocol};
use serde_json::Value;

/// Response parser for the supported wire protocols
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a body according to the protocol a descriptor declares
    pub fn for_protocol(
        protocol: WireProtocol,
        response: &Value,
        provider: ProviderId,
        model: &str,
    ) -> AiResult<Completion> {
        match protocol {
            WireProtocol::OpenAiChat => Self::parse_openai(response, provider, model),
            WireProtocol::GeminiGenerateContent => Self::parse_gemini(response, provider, model),
        }
    }

    /// Parse an OpenAI chat-completions response
    pub fn parse_openai(response: &Value, provider: ProviderId, model: &str) -> AiResult<Completion> {
        let choices = response["choices"]
            .as_array()
            .ok_or_else(|| AiError::parse(provider.name(), "no choices array in response"))?;
        let first = choices
            .first()
            .ok_or_else(|| AiError::parse(provider.name(), "empty choices array"))?;
        let message = first
            .get("message")
            .ok_or_else(|| AiError::parse(provider.name(), "choice missing message object"))?;

        // Content may legitimately be empty; only its container is mandatory
        let content = message["content"].as_str().unwrap_or("").to_string();

        Ok(Completion {
            content,
            model: model.to_string(),
            provider,
            usage: Self::parse_openai_usage(&response["usage"]),
        })
    }

    /// Parse a Gemini generateContent response
    pub fn parse_gemini(response: &Value, provider: ProviderId, model: &str) -> AiResult<Completion> {
        let candidates = response["candidates"]
            .as_array()
            .ok_or_else(|| AiError::parse(provider.name(), "no candidates array in response"))?;
        let candidate = candidates
            .first()
            .ok_or_else(|| AiError::parse(provider.name(), "empty candidates array"))?;
        let parts = candidate["content"]["parts"]
            .as_array()
            .ok_or_else(|| AiError::parse(provider.name(), "candidate missing content parts"))?;

        let mut content = String::new();
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        Ok(Completion {
            content,
            model: model.to_string(),
            provider,
            usage: Self::parse_gemini_usage(&response["usageMetadata"]),
        })
    }

    fn parse_openai_usage(usage: &Value) -> TokenUsage {
        let prompt_tokens = usage["prompt_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = usage["completion_tokens"].as_u64().unwrap_or(0) as u32;
        let total_tokens = usage["total_tokens"]
            .as_u64()
            .unwrap_or((prompt_tokens + completion_tokens) as u64) as u32;
        TokenUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    fn parse_gemini_usage(usage: &Value) -> TokenUsage {
        let prompt_tokens = usage["promptTokenCount"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = usage["candidatesTokenCount"].as_u64().unwrap_or(0) as u32;
        let total_tokens = usage["totalTokenCount"]
            .as_u64()
            .unwrap_or((prompt_tokens + completion_tokens) as u64) as u32;
        TokenUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}
