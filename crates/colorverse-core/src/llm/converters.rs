//! Request body construction for each wire protocol
//!
//! Pure functions: normalized messages and options in, provider JSON out.
//! No I/O and no shared state, so both shapes are unit-tested without a
//! network.

use crate::llm::messages::{ChatMessage, CompletionOptions, MessageRole};
use crate::llm::registry::WireProtocol;
use serde_json::{json, Value};

/// Request format converter
pub struct RequestConverter;

impl RequestConverter {
    /// Build the body for the protocol a descriptor declares
    pub fn for_protocol(
        protocol: WireProtocol,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Value {
        match protocol {
            WireProtocol::OpenAiChat => Self::to_openai(model, messages, options),
            WireProtocol::GeminiGenerateContent => Self::to_gemini(messages, options),
        }
    }

    /// OpenAI chat-completions body
    pub fn to_openai(model: &str, messages: &[ChatMessage], options: &CompletionOptions) -> Value {
        let converted: Vec<Value> = messages
            .iter()
            .map(|message| {
                json!({
                    "role": message.role.to_string(),
                    "content": message.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": model,
            "messages": converted,
            "temperature": options.temperature,
        });

        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if options.json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        body
    }

    /// Gemini generateContent body.
    ///
    /// The model is addressed in the URL path, not the body. System messages
    /// are lifted into the separate `systemInstruction` field, and the
    /// assistant role is renamed to Gemini's `model` role.
    pub fn to_gemini(messages: &[ChatMessage], options: &CompletionOptions) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => {
                    system_parts.push(json!({"text": message.content}));
                }
                MessageRole::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{"text": message.content}],
                    }));
                }
                MessageRole::Assistant => {
                    contents.push(json!({
                        "role": "model",
                        "parts": [{"text": message.content}],
                    }));
                }
            }
        }

        let mut body = json!({"contents": contents});

        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({"parts": system_parts});
        }

        let mut generation_config = json!({"temperature": options.temperature});
        if let Some(max_tokens) = options.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if options.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }
        body["generationConfig"] = generation_config;

        body
    }
}
