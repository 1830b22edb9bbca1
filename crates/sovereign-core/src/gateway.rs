//! Completion Gateway
//!
//! Sends one rendered prompt, framed by a fixed system persona, to the
//! injected provider and turns whatever comes back into a displayable
//! `CompletionResult`. Provider failures never escape as errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::Message;
use crate::provider::{DEFAULT_MODEL, GenerationOptions, LlmProvider};

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// System message sent ahead of every prompt
    pub system_prompt: String,

    /// Model used when the caller does not name one
    pub default_model: String,
}

impl GatewayConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            default_model: DEFAULT_MODEL.into(),
        }
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

/// Category of a failed completion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionErrorKind {
    Transport,
    Unavailable,
    Auth,
    RateLimited,
    HttpStatus,
    MalformedResponse,
}

/// Structured failure of a gateway call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub detail: String,
}

impl From<AgentError> for CompletionError {
    fn from(err: AgentError) -> Self {
        let kind = match &err {
            AgentError::Provider(_) => CompletionErrorKind::Transport,
            AgentError::ProviderUnavailable(_) => CompletionErrorKind::Unavailable,
            AgentError::Auth(_) => CompletionErrorKind::Auth,
            AgentError::RateLimited(_) => CompletionErrorKind::RateLimited,
            AgentError::HttpStatus { .. } => CompletionErrorKind::HttpStatus,
            AgentError::MalformedResponse(_) => CompletionErrorKind::MalformedResponse,
        };

        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.detail)
    }
}

/// Outcome of one gateway call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionResult {
    /// Trimmed text of the first choice
    Text(String),
    Failed(CompletionError),
}

impl CompletionResult {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    pub const fn error(&self) -> Option<&CompletionError> {
        match self {
            Self::Text(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Text shown in the output area: the completion or `Error: {detail}`
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Failed(err) => err.to_string(),
        }
    }
}

/// Single-shot completion gateway over an injected provider
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn LlmProvider>,
    config: GatewayConfig,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GatewayConfig) -> Self {
        Self { provider, config }
    }

    /// Run one `[system, user]` exchange. `model` falls back to the default.
    pub async fn complete(&self, prompt: &str, model: Option<&str>) -> CompletionResult {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model);
        let options = GenerationOptions::for_model(model);
        let messages = self.conversation(prompt);

        tracing::debug!(model = %model, prompt_len = prompt.len(), "Sending completion");

        match self.provider.complete(&messages, &options).await {
            Ok(completion) => CompletionResult::Text(completion.content.trim().to_string()),
            Err(e) => {
                tracing::warn!(model = %model, "Completion failed: {}", e);
                CompletionResult::Failed(e.into())
            }
        }
    }

    fn conversation(&self, prompt: &str) -> [Message; 2] {
        [
            Message::system(self.config.system_prompt.as_str()),
            Message::user(prompt),
        ]
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::testing::StubProvider;

    fn gateway(provider: Arc<StubProvider>) -> CompletionGateway {
        CompletionGateway::new(provider, GatewayConfig::new("You are a test persona."))
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_first_choice() {
        let provider = Arc::new(StubProvider::replying("\n  Summary ready.  \n"));
        let result = gateway(provider.clone()).complete("Summarize", None).await;

        assert_eq!(result, CompletionResult::Text("Summary ready.".into()));
        assert_eq!(result.text(), Some("Summary ready."));
        assert_eq!(result.display_text(), "Summary ready.");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sends_persona_then_prompt() {
        let provider = Arc::new(StubProvider::replying("ok"));
        gateway(provider.clone()).complete("Draft a K-1", None).await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        let (messages, options) = &calls[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "You are a test persona.");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Draft a K-1");
        assert_eq!(options.model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_model_override_and_blank_fallback() {
        let provider = Arc::new(StubProvider::replying("ok"));
        let gateway = gateway(provider.clone());

        gateway.complete("a", Some("llama-3.3-70b-versatile")).await;
        gateway.complete("b", Some("   ")).await;

        let calls = provider.calls();
        assert_eq!(calls[0].1.model, "llama-3.3-70b-versatile");
        assert_eq!(calls[1].1.model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_failure_becomes_error_text() {
        let provider = Arc::new(StubProvider::failing(|| {
            AgentError::Auth("invalid api key".into())
        }));
        let result = gateway(provider).complete("Summarize", None).await;

        let err = result.error().expect("failure expected");
        assert_eq!(err.kind, CompletionErrorKind::Auth);
        assert!(result.display_text().starts_with("Error: "));
        assert_eq!(
            result.display_text(),
            "Error: Authentication failed: invalid api key"
        );
    }

    #[test]
    fn test_error_kind_mapping() {
        let err: CompletionError = AgentError::HttpStatus {
            status: 500,
            body: "down".into(),
        }
        .into();
        assert_eq!(err.kind, CompletionErrorKind::HttpStatus);

        let err: CompletionError = AgentError::MalformedResponse("no choices".into()).into();
        assert_eq!(err.kind, CompletionErrorKind::MalformedResponse);
        assert_eq!(err.detail, "Malformed response: no choices");
    }
}
