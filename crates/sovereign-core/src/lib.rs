//! # sovereign-core
//!
//! Provider-agnostic completion plumbing for the Sovereign CFO desk.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  CompletionGateway                        │
//! │  ┌──────────────┐   ┌──────────────┐   ┌───────────────┐  │
//! │  │   Persona    │──▶│  [system,    │──▶│  LlmProvider  │  │
//! │  │   + prompt   │   │   user]      │   │  (Strategy)   │  │
//! │  └──────────────┘   └──────────────┘   └───────────────┘  │
//! │           ▲                                   │           │
//! │           └──── CompletionResult ◀────────────┘           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the gateway talk to Groq, a local model or a
//! test double without changing the caller. The gateway never returns an
//! error to its caller: provider failures come back as a `CompletionResult`.

pub mod error;
pub mod gateway;
pub mod message;
pub mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{AgentError, Result};
pub use gateway::{
    CompletionError, CompletionErrorKind, CompletionGateway, CompletionResult, GatewayConfig,
};
pub use message::{Message, Role};
pub use provider::{GenerationOptions, LlmProvider, DEFAULT_MODEL};
