//! Typed error hierarchy for the Nexus interview engine.
//!
//! Two top-level enums cover the two fallible subsystems:
//! - `LlmError` - chat-client failures (subprocess and HTTP backends)
//! - `SessionError` - interview session persistence failures
//!
//! Extraction and gap detection are deliberately infallible: malformed model
//! output is dropped or defaulted, never surfaced as an error.

use thiserror::Error;

/// Errors from the LLM client layer.
///
/// No retry or fallback happens at this layer; errors propagate to the
/// caller untouched.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Failed to spawn LLM command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("LLM command exited with non-zero code {exit_code}")]
    NonZeroExit { exit_code: i32 },

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("LLM reported an error: {message}")]
    ErrorResult { message: String },

    #[error("Missing API key: set {env_var}")]
    MissingApiKey { env_var: &'static str },

    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode LLM response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("I/O error talking to LLM process: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from interview session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No interview session found at {path}. Run 'nexus interview' first.")]
    NotFound { path: std::path::PathBuf },

    #[error("Failed to read session file at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    WriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is not valid JSON: {source}")]
    DecodeFailed {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session for {path}: {source}")]
    EncodeFailed {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn llm_error_spawn_failed_carries_command() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "claude not found");
        let err = LlmError::SpawnFailed {
            command: "claude".to_string(),
            source: io_err,
        };
        assert!(err.to_string().contains("claude"));
        match &err {
            LlmError::SpawnFailed { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected SpawnFailed variant"),
        }
    }

    #[test]
    fn llm_error_non_zero_exit_carries_code() {
        let err = LlmError::NonZeroExit { exit_code: 127 };
        assert!(err.to_string().contains("127"));
    }

    #[test]
    fn llm_error_missing_api_key_names_env_var() {
        let err = LlmError::MissingApiKey {
            env_var: "ANTHROPIC_API_KEY",
        };
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn session_error_not_found_mentions_interview_command() {
        let err = SessionError::NotFound {
            path: PathBuf::from("/tmp/.nexus/session.json"),
        };
        assert!(err.to_string().contains("nexus interview"));
        assert!(err.to_string().contains("session.json"));
    }

    #[test]
    fn session_error_decode_failed_carries_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SessionError::DecodeFailed {
            path: PathBuf::from("/x/session.json"),
            source: json_err,
        };
        match &err {
            SessionError::DecodeFailed { path, .. } => {
                assert_eq!(path, &PathBuf::from("/x/session.json"));
            }
            _ => panic!("Expected DecodeFailed"),
        }
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&LlmError::EmptyResponse);
        assert_std_error(&SessionError::NotFound {
            path: PathBuf::from("x"),
        });
    }
}
