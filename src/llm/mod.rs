//! LLM client abstraction.
//!
//! The question generator and interview session talk to a model through the
//! [`LlmClient`] trait; two backends are provided:
//!
//! - [`ClaudeCliClient`] - spawns the `claude` binary and decodes its
//!   stream-json output
//! - [`AnthropicClient`] - calls the Anthropic Messages API over HTTP
//!
//! This layer does no retry, backoff, or fallback; failures propagate to the
//! caller as [`LlmError`].

pub mod anthropic;
pub mod claude_cli;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::MessageRole;
use crate::errors::LlmError;

pub use anthropic::AnthropicClient;
pub use claude_cli::ClaudeCliClient;

/// One message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-request options. `None` fields fall back to client defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Token accounting reported by the backend, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Other(String),
}

/// A complete (non-streaming) chat response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: FinishReason,
}

/// Common interface over chat backends.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Backend name for logging and the status display.
    fn name(&self) -> &'static str;

    /// Send the conversation and return the complete response.
    ///
    /// The only suspension point in the interview pipeline; the caller owns
    /// timeouts and cancellation.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory client for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays canned responses and records every request it receives.
    pub struct MockClient {
        responses: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl MockClient {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Messages from the n-th chat call.
        pub fn request(&self, index: usize) -> Vec<ChatMessage> {
            self.requests.lock().unwrap()[index].clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for MockClient {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(
            &self,
            messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<ChatResponse, LlmError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::EmptyResponse)?;
            Ok(ChatResponse {
                content,
                usage: None,
                finish_reason: FinishReason::Stop,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockClient;
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, MessageRole::System);
        assert_eq!(ChatMessage::user("u").role, MessageRole::User);
        assert_eq!(ChatMessage::assistant("a").role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_mock_client_replays_and_records() {
        let client = MockClient::new(vec!["first", "second"]);
        let messages = vec![ChatMessage::user("hello")];

        let one = client.chat(&messages, &ChatOptions::default()).await.unwrap();
        let two = client.chat(&messages, &ChatOptions::default()).await.unwrap();
        assert_eq!(one.content, "first");
        assert_eq!(two.content, "second");
        assert_eq!(client.request_count(), 2);
        assert_eq!(client.request(0)[0].content, "hello");
    }

    #[tokio::test]
    async fn test_mock_client_exhausted_is_empty_response() {
        let client = MockClient::new(vec![]);
        let err = client
            .chat(&[ChatMessage::user("x")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
