//! Chat backend for the Anthropic Messages API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::conversation::MessageRole;
use crate::errors::LlmError;

use super::{ChatMessage, ChatOptions, ChatResponse, FinishReason, LlmClient, TokenUsage};

/// Default API endpoint.
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Required API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Model used when neither config nor options name one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_MAX_TOKENS: u32 = 1024;

pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Build a client from `$ANTHROPIC_API_KEY` (a `.env` file is honored).
    pub fn from_env(model: Option<String>) -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| LlmError::MissingApiKey {
            env_var: API_KEY_ENV,
        })?;
        Ok(Self::new(
            api_key,
            model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        ))
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the Messages API request body.
    ///
    /// System messages are concatenated into the top-level `system` field;
    /// user/assistant turns go into `messages` in order.
    fn build_request_body(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> serde_json::Value {
        let model = options.model.as_deref().unwrap_or(&self.model);
        let max_tokens = options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        let mut system_parts: Vec<&str> = Vec::new();
        let mut api_messages: Vec<serde_json::Value> = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(&message.content),
                MessageRole::User | MessageRole::Assistant => {
                    api_messages.push(serde_json::json!({
                        "role": message.role.as_str(),
                        "content": message.content,
                    }));
                }
            }
        }

        let mut body = serde_json::json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": api_messages,
        });
        if !system_parts.is_empty() {
            body["system"] = serde_json::json!(system_parts.join("\n\n"));
        }
        if let Some(temperature) = options.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ApiContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

fn finish_reason_from(stop_reason: Option<&str>) -> FinishReason {
    match stop_reason {
        None | Some("end_turn") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::MaxTokens,
        Some(other) => FinishReason::Other(other.to_string()),
    }
}

fn response_from(api: ApiResponse) -> Result<ChatResponse, LlmError> {
    let content = api
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    if content.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(ChatResponse {
        content,
        usage: api.usage.map(|usage| TokenUsage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        }),
        finish_reason: finish_reason_from(api.stop_reason.as_deref()),
    })
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let body = self.build_request_body(messages, options);
        debug!(model = ?body.get("model"), "sending messages request");

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Http)?;

        let status = response.status();
        let body_text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body_text,
            });
        }

        let api: ApiResponse = serde_json::from_str(&body_text).map_err(LlmError::Decode)?;
        response_from(api)
    }
}
