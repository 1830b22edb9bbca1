//! Test doubles for `LlmProvider`.
//!
//! Enabled for this crate's tests and, through the `test-support` feature,
//! for downstream crates that need a provider without a network.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{
    Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
};

type Reply = Box<dyn Fn() -> Result<String> + Send + Sync>;

/// Provider that records every request and answers from a fixed script
pub struct StubProvider {
    reply: Reply,
    calls: Mutex<Vec<(Vec<Message>, GenerationOptions)>>,
}

impl StubProvider {
    /// Always answer with `content`
    pub fn replying(content: impl Into<String>) -> Self {
        let content = content.into();
        Self::scripted(move || Ok(content.clone()))
    }

    /// Always fail with the error built by `make_error`
    pub fn failing<F>(make_error: F) -> Self
    where
        F: Fn() -> AgentError + Send + Sync + 'static,
    {
        Self::scripted(move || Err(make_error()))
    }

    pub fn scripted<F>(reply: F) -> Self
    where
        F: Fn() -> Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of `complete` calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every `complete` request received, in order
    pub fn calls(&self) -> Vec<(Vec<Message>, GenerationOptions)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// User message of the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .and_then(|(messages, _)| messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Stub".into(),
            endpoint: "memory://stub".into(),
            models: self.list_models().await?,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((messages.to_vec(), options.clone()));

        let content = (self.reply)()?;
        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: crate::DEFAULT_MODEL.into(),
            owned_by: Some("stub".into()),
            context_length: None,
        }])
    }
}
