//! Application State

use std::sync::Arc;

use sovereign_agents::{FundDesk, MemorySessionStore};
use sovereign_core::LlmProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Completion provider (Groq, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Panel runner wired to the provider
    pub desk: FundDesk,

    /// Uploaded datasets, one per session
    pub sessions: Arc<MemorySessionStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LlmProvider>, desk: FundDesk) -> Self {
        Self {
            provider,
            desk,
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }
}
