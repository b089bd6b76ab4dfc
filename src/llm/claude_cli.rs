//! Chat backend that drives the Claude CLI as a subprocess.
//!
//! The conversation is rendered into a single prompt written to stdin; the
//! first system message becomes `--system-prompt`. Output is requested as
//! stream-json and folded down to the final response text, preferring the
//! CLI's own `result` payload over accumulated assistant text.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::conversation::MessageRole;
use crate::errors::LlmError;
use crate::stream::{ContentBlock, StreamEvent};

use super::{ChatMessage, ChatOptions, ChatResponse, FinishReason, LlmClient};

pub struct ClaudeCliClient {
    command: String,
}

impl ClaudeCliClient {
    /// The command comes from config (`llm.claude_cmd`, overridable via
    /// `NEXUS_CLAUDE_CMD` at the config layer).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Split the conversation into a system prompt and a transcript prompt.
    ///
    /// System messages are concatenated for `--system-prompt`; the rest is
    /// rendered as a `User:`/`Assistant:` transcript the CLI continues from.
    fn render_prompt(messages: &[ChatMessage]) -> (Option<String>, String) {
        let mut system_parts = Vec::new();
        let mut transcript = String::new();

        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content.clone()),
                MessageRole::User => {
                    transcript.push_str("User: ");
                    transcript.push_str(&message.content);
                    transcript.push_str("\n\n");
                }
                MessageRole::Assistant => {
                    transcript.push_str("Assistant: ");
                    transcript.push_str(&message.content);
                    transcript.push_str("\n\n");
                }
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };
        (system, transcript.trim_end().to_string())
    }
}

#[async_trait]
impl LlmClient for ClaudeCliClient {
    fn name(&self) -> &'static str {
        "claude-cli"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let (system, prompt) = Self::render_prompt(messages);

        let mut cmd = Command::new(&self.command);
        if let Some(system) = &system {
            cmd.arg("--system-prompt").arg(system);
        }
        if let Some(model) = &options.model {
            cmd.arg("--model").arg(model);
        }
        cmd.arg("--print")
            .arg("--output-format")
            .arg("stream-json")
            .arg("--verbose");

        debug!(command = %self.command, prompt_chars = prompt.len(), "spawning claude");

        let mut child = cmd
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|source| LlmError::SpawnFailed {
                command: self.command.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let stdout = child.stdout.take().ok_or(LlmError::EmptyResponse)?;
        let mut reader = BufReader::new(stdout).lines();

        let mut accumulated_text = String::new();
        let mut final_result: Option<String> = None;
        let mut is_error = false;

        while let Some(line) = reader.next_line().await? {
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<StreamEvent>(&line) {
                Ok(StreamEvent::Assistant { message }) => {
                    for content in message.content {
                        if let ContentBlock::Text { text } = content {
                            accumulated_text.push_str(&text);
                            accumulated_text.push('\n');
                        }
                    }
                }
                Ok(StreamEvent::Result {
                    result,
                    is_error: err,
                    ..
                }) => {
                    final_result = result;
                    is_error = err;
                }
                Ok(StreamEvent::User {}) | Ok(StreamEvent::System { .. }) => {}
                Err(_) => {
                    // Not stream-json; keep it, the CLI sometimes mixes in
                    // plain lines.
                    accumulated_text.push_str(&line);
                    accumulated_text.push('\n');
                }
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(LlmError::NonZeroExit {
                exit_code: status.code().unwrap_or(-1),
            });
        }

        let content = final_result.unwrap_or(accumulated_text);
        let content = content.trim().to_string();

        if is_error {
            return Err(LlmError::ErrorResult { message: content });
        }
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(ChatResponse {
            content,
            usage: None,
            finish_reason: FinishReason::Stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_splits_system_from_transcript() {
        let messages = vec![
            ChatMessage::system("You are an interviewer."),
            ChatMessage::user("I want a todo app"),
            ChatMessage::assistant("Who will use it?"),
            ChatMessage::user("Just me"),
        ];
        let (system, prompt) = ClaudeCliClient::render_prompt(&messages);

        assert_eq!(system.as_deref(), Some("You are an interviewer."));
        assert_eq!(
            prompt,
            "User: I want a todo app\n\nAssistant: Who will use it?\n\nUser: Just me"
        );
    }

    #[test]
    fn test_render_prompt_no_system_messages() {
        let messages = vec![ChatMessage::user("hello")];
        let (system, prompt) = ClaudeCliClient::render_prompt(&messages);
        assert!(system.is_none());
        assert_eq!(prompt, "User: hello");
    }

    #[test]
    fn test_render_prompt_joins_multiple_system_messages() {
        let messages = vec![ChatMessage::system("one"), ChatMessage::system("two")];
        let (system, prompt) = ClaudeCliClient::render_prompt(&messages);
        assert_eq!(system.as_deref(), Some("one\n\ntwo"));
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_client_identity() {
        let client = ClaudeCliClient::new("claude");
        assert_eq!(client.command(), "claude");
        assert_eq!(client.name(), "claude-cli");
    }

    #[tokio::test]
    async fn test_chat_spawn_failure_is_typed() {
        let client = ClaudeCliClient::new("nexus-test-no-such-binary");
        let err = client
            .chat(&[ChatMessage::user("hi")], &ChatOptions::default())
            .await
            .unwrap_err();
        match err {
            LlmError::SpawnFailed { command, .. } => {
                assert_eq!(command, "nexus-test-no-such-binary")
            }
            other => panic!("Expected SpawnFailed, got {other:?}"),
        }
    }
}
