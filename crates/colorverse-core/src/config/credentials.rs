//! API key resolution for providers

use crate::llm::registry::{ProviderDescriptor, ProviderId};
use std::collections::HashMap;

/// Per-provider credential store.
///
/// Resolution order mirrors the rest of the configuration surface: an
/// explicitly configured key wins, then the descriptor's environment
/// variable is consulted at call time. Keys are never baked into the
/// registry itself.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    keys: HashMap<ProviderId, String>,
}

impl CredentialStore {
    /// Create an empty store (environment lookup only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit API key for a provider
    pub fn set(&mut self, provider: ProviderId, key: impl Into<String>) {
        self.keys.insert(provider, key.into());
    }

    /// Resolve the effective API key for a provider, if any
    pub fn resolve(&self, descriptor: &ProviderDescriptor) -> Option<String> {
        if let Some(key) = self.keys.get(&descriptor.id) {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        match std::env::var(descriptor.api_key_env) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => None,
        }
    }

    /// Whether a credential is configured for this provider
    pub fn has_credential(&self, descriptor: &ProviderDescriptor) -> bool {
        self.resolve(descriptor).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::registry::{AuthScheme, WireProtocol};

    static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
        id: ProviderId::OpenRouter,
        display_name: "OpenRouter",
        base_url: "http://localhost",
        endpoint: "/chat/completions",
        models: &["test-model"],
        protocol: WireProtocol::OpenAiChat,
        requires_auth: true,
        auth: AuthScheme::BearerHeader,
        extra_headers: &[],
        api_key_env: "COLORVERSE_CREDENTIAL_TEST_KEY",
    };

    #[test]
    fn explicit_key_wins_over_environment() {
        unsafe { std::env::set_var("COLORVERSE_CREDENTIAL_TEST_KEY", "from-env") };
        let mut store = CredentialStore::new();
        store.set(ProviderId::OpenRouter, "from-config");
        assert_eq!(store.resolve(&DESCRIPTOR).as_deref(), Some("from-config"));
        unsafe { std::env::remove_var("COLORVERSE_CREDENTIAL_TEST_KEY") };
    }

    #[test]
    fn missing_key_resolves_to_none() {
        let store = CredentialStore::new();
        // Env var deliberately unset for this name
        let descriptor = ProviderDescriptor {
            api_key_env: "COLORVERSE_CREDENTIAL_TEST_UNSET",
            ..DESCRIPTOR.clone()
        };
        assert!(store.resolve(&descriptor).is_none());
        assert!(!store.has_credential(&descriptor));
    }

    #[test]
    fn empty_explicit_key_is_ignored() {
        let mut store = CredentialStore::new();
        store.set(ProviderId::OpenRouter, "");
        let descriptor = ProviderDescriptor {
            api_key_env: "COLORVERSE_CREDENTIAL_TEST_UNSET",
            ..DESCRIPTOR.clone()
        };
        assert!(store.resolve(&descriptor).is_none());
    }
}
