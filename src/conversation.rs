//! Conversation records shared by the extractor, question generator, and
//! interview session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::ExtractedRequirement;

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Wire label used by chat APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single turn in the interview conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    /// Create a message stamped with the current time and a fresh id.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Immutable input to a single question-generation call.
///
/// Owned snapshots only; the generator never mutates the context. The
/// interview session rebuilds one per call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Ordered conversation history, oldest first.
    pub history: Vec<ConversationMessage>,
    /// Requirements accumulated so far across the whole interview.
    pub extracted_requirements: Vec<ExtractedRequirement>,
    /// Topic areas the conversation has already touched, lowercased.
    pub explored_areas: Vec<String>,
    /// Optional one-paragraph project description.
    pub project_description: Option<String>,
}

impl GenerationContext {
    /// Id of the most recent user-authored message, if any.
    pub fn last_user_message_id(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.id.as_str())
    }

    /// Most recently explored area, if any.
    pub fn last_explored_area(&self) -> Option<&str> {
        self.explored_areas.last().map(String::as_str)
    }
}
