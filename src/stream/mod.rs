//! Decoding for the Claude CLI's `stream-json` output format.
//!
//! The CLI emits one JSON event per line. The interview engine only cares
//! about assistant text and the final `result` payload; tool-use and system
//! events are decoded so malformed-line handling stays predictable, then
//! ignored.

use serde::Deserialize;
use serde_json::Value;

/// Events from Claude CLI's stream-json output format.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "assistant")]
    Assistant { message: AssistantMessage },

    #[serde(rename = "user")]
    User {},

    #[serde(rename = "result")]
    Result {
        subtype: String,
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        is_error: bool,
    },

    #[serde(rename = "system")]
    System { subtype: String },
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        name: String,
        input: Value,
        #[serde(default)]
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assistant_text_event() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"text","text":"What does the product do?"}]}}"#;
        let event: StreamEvent = serde_json::from_str(line).unwrap();
        match event {
            StreamEvent::Assistant { message } => {
                assert_eq!(message.content.len(), 1);
                match &message.content[0] {
                    ContentBlock::Text { text } => {
                        assert_eq!(text, "What does the product do?")
                    }
                    _ => panic!("Expected text block"),
                }
            }
            _ => panic!("Expected assistant event"),
        }
    }

    #[test]
    fn test_parse_result_event() {
        let line = r#"{"type":"result","subtype":"success","result":"final text","is_error":false}"#;
        let event: StreamEvent = serde_json::from_str(line).unwrap();
        match event {
            StreamEvent::Result {
                subtype,
                result,
                is_error,
            } => {
                assert_eq!(subtype, "success");
                assert_eq!(result.as_deref(), Some("final text"));
                assert!(!is_error);
            }
            _ => panic!("Expected result event"),
        }
    }

    #[test]
    fn test_parse_result_event_without_payload() {
        let line = r#"{"type":"result","subtype":"error_during_execution"}"#;
        let event: StreamEvent = serde_json::from_str(line).unwrap();
        match event {
            StreamEvent::Result { result, .. } => assert!(result.is_none()),
            _ => panic!("Expected result event"),
        }
    }

    #[test]
    fn test_parse_system_event() {
        let line = r#"{"type":"system","subtype":"init"}"#;
        let event: StreamEvent = serde_json::from_str(line).unwrap();
        assert!(matches!(event, StreamEvent::System { .. }));
    }

    #[test]
    fn test_invalid_json_fails_to_parse() {
        assert!(serde_json::from_str::<StreamEvent>("not json").is_err());
    }
}
