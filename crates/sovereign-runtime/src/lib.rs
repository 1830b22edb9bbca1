//! # sovereign-runtime
//!
//! Completion providers for the Sovereign CFO desk.
//!
//! ## Providers
//!
//! - **Groq** (default): hosted inference over the OpenAI-compatible
//!   chat-completions API. Any other OpenAI-compatible endpoint works by
//!   pointing `GROQ_BASE_URL` at it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sovereign_runtime::GroqProvider;
//!
//! let provider = Arc::new(GroqProvider::from_env());
//! let gateway = CompletionGateway::new(provider, GatewayConfig::new(persona));
//! ```

pub mod groq;

pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use sovereign_core::{AgentError, LlmProvider, Message, Result, Role};
