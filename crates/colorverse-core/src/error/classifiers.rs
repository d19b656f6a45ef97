//! Error classification driving retry and fallback decisions

use super::types::AiError;

impl AiError {
    /// HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AiError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether this error should trigger another attempt on the same model.
    ///
    /// Server errors (500/502/503/504), transport failures, and unparseable
    /// responses are transient. Everything else (401, 429, 403, client
    /// errors) is terminal for the current attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Api { status_code, .. } => {
                matches!(*status_code, 500 | 502 | 503 | 504)
            }
            AiError::Http { .. } => true,
            AiError::Parse { .. } => true,
            _ => false,
        }
    }

    /// Whether this error makes the rest of the provider's models pointless.
    ///
    /// Rate limits (429) and quota exhaustion (403) apply to the account, not
    /// the model, so the orchestrator skips straight to the next provider.
    /// A missing credential is shared by every model of the provider too.
    pub fn exhausts_provider(&self) -> bool {
        matches!(
            self,
            AiError::Api {
                status_code: 429 | 403,
                ..
            } | AiError::MissingCredential { .. }
        )
    }

    /// Whether this is an authentication rejection (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AiError::Api {
                status_code: 401,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        for status in [500, 502, 503, 504] {
            let error = AiError::api("pollinations", status, "upstream blew up");
            assert!(error.is_retryable(), "status {} should retry", status);
            assert!(!error.exhausts_provider());
        }
    }

    #[test]
    fn transport_and_parse_failures_are_retryable() {
        assert!(AiError::http("connection reset by peer").is_retryable());
        assert!(AiError::parse("gemini", "no candidates array").is_retryable());
    }

    #[test]
    fn unauthorized_is_terminal_but_model_scoped() {
        let error = AiError::api("openrouter", 401, "invalid key");
        assert!(!error.is_retryable());
        assert!(!error.exhausts_provider());
        assert!(error.is_unauthorized());
    }

    #[test]
    fn rate_limit_and_quota_exhaust_the_provider() {
        for status in [429, 403] {
            let error = AiError::api("openrouter", status, "slow down");
            assert!(!error.is_retryable());
            assert!(error.exhausts_provider(), "status {} skips provider", status);
        }
    }

    #[test]
    fn missing_credential_exhausts_the_provider() {
        let error = AiError::missing_credential("openrouter");
        assert!(!error.is_retryable());
        assert!(error.exhausts_provider());
    }

    #[test]
    fn status_code_accessor() {
        assert_eq!(AiError::api("gemini", 503, "x").status_code(), Some(503));
        assert_eq!(AiError::http("dns failure").status_code(), None);
    }
}
