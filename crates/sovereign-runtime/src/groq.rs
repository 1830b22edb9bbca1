//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` over Groq's OpenAI-compatible
//! chat-completions API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use sovereign_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const MAX_ERROR_BODY_CHARS: usize = 400;

/// Groq provider configuration
#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// API credential; requests fail with an auth error when absent
    pub api_key: Option<String>,

    /// Base URL up to and including the API version segment
    pub base_url: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl GroqConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url =
            std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Self::new(api_key, base_url)
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Groq chat-completions provider
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create from configuration
    pub fn from_config(config: GroqConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(GroqConfig::from_env())
    }

    /// Create with a caller-supplied HTTP client
    pub const fn with_client(client: Client, config: GroqConfig) -> Self {
        Self { client, config }
    }

    pub const fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::Auth("missing GROQ_API_KEY".into()))?;
        Ok(request.bearer_auth(key))
    }

    fn build_request<'a>(
        messages: &'a [Message],
        options: &'a GenerationOptions,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Pull the first choice out of a parsed response
    fn convert_completion(response: ChatCompletionResponse, model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::MalformedResponse("response contained no choices".into()))?;

        let content = choice.message.content.ok_or_else(|| {
            AgentError::MalformedResponse("first choice has no message content".into())
        })?;

        Ok(Completion {
            content,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AgentError::ProviderUnavailable(e.to_string())
            } else {
                AgentError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        Err(Self::status_error(status, &body))
    }

    fn status_error(status: StatusCode, body: &str) -> AgentError {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.chars().take(MAX_ERROR_BODY_CHARS).collect());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(detail),
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(detail),
            _ => AgentError::HttpStatus {
                status: status.as_u16(),
                body: detail,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Groq".into(),
            endpoint: self.config.base_url.clone(),
            models,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let payload = Self::build_request(messages, options);
        let request = self
            .authorized(self.client.post(self.endpoint("chat/completions")))?
            .json(&payload);

        let response = self.send(request).await?;
        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        Self::convert_completion(parsed, &options.model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let request = self.authorized(self.client.get(self.endpoint("models")))?;
        let response = self.send(request).await?;
        let parsed = response
            .json::<ModelListResponse>()
            .await
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        Ok(parsed
            .data
            .into_iter()
            .map(|m| ModelInfo {
                id: m.id,
                owned_by: m.owned_by,
                context_length: m.context_window,
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
    #[serde(default)]
    context_window: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, key: Option<&str>) -> GroqProvider {
        GroqProvider::from_config(GroqConfig::new(key.map(String::from), server.uri()))
    }

    fn conversation() -> Vec<Message> {
        vec![Message::system("You are Sovereign AI."), Message::user("Hello")]
    }

    #[test]
    fn test_config_defaults() {
        let config = GroqConfig::default();
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = GroqConfig::new(None, "http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_request_shape() {
        let messages = conversation();
        let options = GenerationOptions::default();
        let json = serde_json::to_value(GroqProvider::build_request(&messages, &options)).unwrap();

        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert!(json.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        let body = r#"{
            "model": "llama-3.1-8b-instant",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  first  "}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_string_contains("You are Sovereign AI."))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let completion = provider(&server, Some("test-key"))
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect("success response");

        assert_eq!(completion.content, "  first  ");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(12));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_raw(
                r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let err = provider(&server, Some("bad-key"))
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect_err("expected auth error");

        match err {
            AgentError::Auth(detail) => assert_eq!(detail, "Invalid API Key"),
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
            .mount(&server)
            .await;

        let err = provider(&server, Some("test-key"))
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect_err("expected status error");

        match err {
            AgentError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "provider down");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = provider(&server, Some("test-key"))
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect_err("expected rate limit");

        assert!(matches!(err, AgentError::RateLimited(ref d) if d == "slow down"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"choices": []}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let err = provider(&server, Some("test-key"))
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect_err("expected malformed response");

        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .complete(&conversation(), &GenerationOptions::default())
            .await
            .expect_err("missing key should fail");

        assert!(matches!(err, AgentError::Auth(ref d) if d == "missing GROQ_API_KEY"));
    }

    #[tokio::test]
    async fn test_list_models_and_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"object": "list", "data": [
                    {"id": "llama-3.1-8b-instant", "owned_by": "Meta", "context_window": 131072}
                ]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = provider(&server, Some("test-key"));
        let models = provider.list_models().await.expect("models");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "llama-3.1-8b-instant");
        assert_eq!(models[0].context_length, Some(131_072));
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_false_without_key() {
        let server = MockServer::start().await;
        assert!(!provider(&server, None).health_check().await.unwrap());
    }
}
