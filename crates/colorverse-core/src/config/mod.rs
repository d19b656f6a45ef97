//! Configuration for retry behavior, HTTP timeouts, and credentials

mod credentials;
mod retry;
mod timeouts;

pub use credentials::CredentialStore;
pub use retry::RetryConfig;
pub use timeouts::TimeoutConfig;
