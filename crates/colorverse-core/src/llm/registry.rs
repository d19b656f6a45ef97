//! Provider registry: static descriptors for every supported provider
//!
//! Descriptors are pure configuration. Everything that varies per provider
//! at runtime (health, success counts) lives in the status tracker; the
//! wire-format differences are captured by the closed [`WireProtocol`] set
//! so request formatting and response parsing stay statically dispatched
//! and independently testable.

use serde::{Deserialize, Serialize};

/// Supported completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Pollinations text gateway (OpenAI-compatible, key optional)
    Pollinations,
    /// OpenRouter (OpenAI-compatible, bearer key required)
    OpenRouter,
    /// Google Gemini (generateContent convention, key as query parameter)
    Gemini,
}

impl ProviderId {
    /// Get the provider name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ProviderId::Pollinations => "pollinations",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pollinations" => Ok(ProviderId::Pollinations),
            "openrouter" => Ok(ProviderId::OpenRouter),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Wire shape of a provider's request/response JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireProtocol {
    /// OpenAI chat-completions shape (`messages` in, `choices` out)
    OpenAiChat,
    /// Google generateContent shape (`contents` in, `candidates` out)
    GeminiGenerateContent,
}

/// How the credential travels on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>` header
    BearerHeader,
    /// Query parameter with the given name
    QueryParam(&'static str),
}

/// Immutable configuration for one provider
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub base_url: &'static str,
    /// Path appended to `base_url`; `{model}` is substituted where present
    pub endpoint: &'static str,
    /// Candidate models ordered by preferred quality
    pub models: &'static [&'static str],
    pub protocol: WireProtocol,
    /// Whether a credential is mandatory for this provider
    pub requires_auth: bool,
    pub auth: AuthScheme,
    /// Static headers sent with every request
    pub extra_headers: &'static [(&'static str, &'static str)],
    /// Environment variable consulted for the credential
    pub api_key_env: &'static str,
}

static BUILTIN_DESCRIPTORS: [ProviderDescriptor; 3] = [
    ProviderDescriptor {
        id: ProviderId::Pollinations,
        display_name: "Pollinations",
        base_url: "https://text.pollinations.ai",
        endpoint: "/openai",
        models: &[
            "openai",
            "openai-large",
            "qwen-coder",
            "mistral",
            "llama",
            "deepseek",
        ],
        protocol: WireProtocol::OpenAiChat,
        requires_auth: false,
        auth: AuthScheme::BearerHeader,
        extra_headers: &[],
        api_key_env: "POLLINATIONS_API_KEY",
    },
    ProviderDescriptor {
        id: ProviderId::OpenRouter,
        display_name: "OpenRouter",
        base_url: "https://openrouter.ai/api/v1",
        endpoint: "/chat/completions",
        models: &[
            "deepseek/deepseek-chat-v3-0324:free",
            "meta-llama/llama-3.3-70b-instruct:free",
            "mistralai/mistral-small-3.1-24b-instruct:free",
            "google/gemma-3-27b-it:free",
            "qwen/qwen-2.5-72b-instruct:free",
        ],
        protocol: WireProtocol::OpenAiChat,
        requires_auth: true,
        auth: AuthScheme::BearerHeader,
        extra_headers: &[
            ("HTTP-Referer", "https://colorverse.app"),
            ("X-Title", "ColorVerse"),
        ],
        api_key_env: "OPENROUTER_API_KEY",
    },
    ProviderDescriptor {
        id: ProviderId::Gemini,
        display_name: "Google Gemini",
        base_url: "https://generativelanguage.googleapis.com",
        endpoint: "/v1beta/models/{model}:generateContent",
        models: &[
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
            "gemini-1.5-flash",
            "gemini-1.5-flash-8b",
            "gemini-1.5-pro",
        ],
        protocol: WireProtocol::GeminiGenerateContent,
        requires_auth: true,
        auth: AuthScheme::QueryParam("key"),
        extra_headers: &[],
        api_key_env: "GEMINI_API_KEY",
    },
];

/// Lookup table over a fixed descriptor set.
///
/// The built-in set is what production uses; tests substitute their own
/// static slice to exercise the orchestrator against scripted providers.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRegistry {
    descriptors: &'static [ProviderDescriptor],
}

impl ProviderRegistry {
    /// Create a registry over a custom descriptor slice
    pub const fn new(descriptors: &'static [ProviderDescriptor]) -> Self {
        Self { descriptors }
    }

    /// The built-in production descriptor set
    pub fn builtin() -> Self {
        Self::new(&BUILTIN_DESCRIPTORS)
    }

    /// Descriptor for a provider, if present in this registry
    pub fn get(&self, id: ProviderId) -> Option<&'static ProviderDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// All descriptors in registry order
    pub fn descriptors(&self) -> &'static [ProviderDescriptor] {
        self.descriptors
    }

    /// Default fallback chain: registry order
    pub fn priority_order(&self) -> Vec<ProviderId> {
        self.descriptors.iter().map(|d| d.id).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn builtin_registry_covers_all_providers() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.priority_order(),
            vec![
                ProviderId::Pollinations,
                ProviderId::OpenRouter,
                ProviderId::Gemini
            ]
        );
        for id in registry.priority_order() {
            assert!(registry.get(id).is_some());
        }
    }

    #[test]
    fn gemini_descriptor_uses_path_template_and_query_key() {
        let descriptor = ProviderRegistry::builtin().get(ProviderId::Gemini).unwrap();
        assert!(descriptor.endpoint.contains("{model}"));
        assert_eq!(descriptor.auth, AuthScheme::QueryParam("key"));
        assert_eq!(descriptor.protocol, WireProtocol::GeminiGenerateContent);
        assert!(descriptor.requires_auth);
    }

    #[test]
    fn pollinations_works_without_mandatory_auth() {
        let descriptor = ProviderRegistry::builtin()
            .get(ProviderId::Pollinations)
            .unwrap();
        assert!(!descriptor.requires_auth);
        assert!(descriptor.models.len() > 5, "exercises the selector cap");
    }

    #[test]
    fn provider_id_round_trips_through_strings() {
        for id in [
            ProviderId::Pollinations,
            ProviderId::OpenRouter,
            ProviderId::Gemini,
        ] {
            assert_eq!(ProviderId::from_str(id.name()).unwrap(), id);
        }
        assert_eq!(
            ProviderId::from_str("google").unwrap(),
            ProviderId::Gemini
        );
        assert!(ProviderId::from_str("yodel").is_err());
    }
}
