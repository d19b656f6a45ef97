//! ColorVerse AI Completion Core
//!
//! The text-generation backbone of the ColorVerse site: a single completion
//! call fanned out across several third-party providers with per-model
//! retries, exponential backoff, health tracking, and ordered fallback.
//! Rendering, routing, and caching live elsewhere; this crate only turns a
//! list of chat messages into a normalized completion or a final error.
//!
//! # Example
//!
//! ```no_run
//! use colorverse_core::{AiManager, ChatMessage, CompletionOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = AiManager::new()?;
//!
//! let messages = vec![
//!     ChatMessage::system("You write one-line prompts for coloring pages."),
//!     ChatMessage::user("A friendly dragon in a vegetable garden."),
//! ];
//!
//! let completion = manager
//!     .create_completion(&messages, &CompletionOptions::default())
//!     .await?;
//! println!("{} (via {})", completion.content, completion.provider);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod llm;

pub use config::{CredentialStore, RetryConfig, TimeoutConfig};
pub use error::{AiError, AiResult};
pub use llm::{
    AiManager, AiManagerBuilder, ChatMessage, Completion, CompletionOptions, MessageRole,
    ProviderId, ProviderStatusSnapshot, TokenUsage,
};
