//! Interview session engine.
//!
//! Owns the conversation state for one requirements interview: history,
//! accumulated requirements, and explored areas. Each round trips through
//! two model calls - one to ask the next question, one to restate the
//! user's answer as `<requirement>` blocks for the extractor.
//!
//! Session state persists as JSON under `.nexus/` so an interview can be
//! resumed and inspected by `nexus status` / `nexus gaps`.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::conversation::{ConversationMessage, GenerationContext, MessageRole};
use crate::errors::{LlmError, SessionError};
use crate::extraction::{Category, ExtractedRequirement, ExtractionResult, RequirementExtractor};
use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::question::prompts::EXTRACTION_SYSTEM_PROMPT;
use crate::question::{GeneratedQuestion, QuestionGenerator, detect_gaps, should_suggest_gap};

/// Serializable snapshot of an interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub history: Vec<ConversationMessage>,
    pub requirements: Vec<ExtractedRequirement>,
    pub explored_areas: Vec<String>,
    pub project_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(project_description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            history: Vec::new(),
            requirements: Vec::new(),
            explored_areas: Vec::new(),
            project_description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Load a session from disk.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Err(SessionError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| SessionError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SessionError::DecodeFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the session to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            SessionError::EncodeFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| SessionError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Requirement counts per category, in display order, zero counts
    /// omitted.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::all()
            .into_iter()
            .filter_map(|category| {
                let count = self
                    .requirements
                    .iter()
                    .filter(|requirement| requirement.category == category)
                    .count();
                (count > 0).then_some((category, count))
            })
            .collect()
    }

    /// Standard areas this session has not touched yet.
    pub fn gaps(&self) -> Vec<&'static str> {
        detect_gaps(&self.explored_areas)
    }
}

/// A live interview, combining state with the extraction and generation
/// pipeline.
pub struct InterviewSession {
    state: SessionState,
    extractor: RequirementExtractor,
    generator: QuestionGenerator,
    client: Arc<dyn LlmClient>,
    options: ChatOptions,
}

impl InterviewSession {
    /// Start a fresh interview.
    pub fn new(
        client: Arc<dyn LlmClient>,
        confidence_threshold: f64,
        options: ChatOptions,
        project_description: Option<String>,
    ) -> Self {
        Self::resume(
            SessionState::new(project_description),
            client,
            confidence_threshold,
            options,
        )
    }

    /// Continue from previously saved state.
    pub fn resume(
        state: SessionState,
        client: Arc<dyn LlmClient>,
        confidence_threshold: f64,
        options: ChatOptions,
    ) -> Self {
        let extractor = RequirementExtractor::with_confidence_threshold(confidence_threshold);
        let generator = QuestionGenerator::with_options(client.clone(), options.clone());
        Self {
            state,
            extractor,
            generator,
            client,
            options,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Consume the session, yielding its state for persistence.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Snapshot the current state as a generation context.
    fn context(&self) -> GenerationContext {
        GenerationContext {
            history: self.state.history.clone(),
            extracted_requirements: self.state.requirements.clone(),
            explored_areas: self.state.explored_areas.clone(),
            project_description: self.state.project_description.clone(),
        }
    }

    /// Whether the next prompt will carry a gap hint.
    pub fn gap_hint_eligible(&self) -> bool {
        should_suggest_gap(&self.context())
    }

    /// Ask the model for the next question and record it as an assistant
    /// turn.
    pub async fn next_question(&mut self) -> Result<GeneratedQuestion, LlmError> {
        let question = self.generator.generate(&self.context()).await?;
        self.state.history.push(ConversationMessage::new(
            MessageRole::Assistant,
            question.question.clone(),
        ));
        self.state.updated_at = Utc::now();
        Ok(question)
    }

    /// Record the user's answer, extract its requirements, and fold them
    /// into the session.
    ///
    /// Returns the per-answer extraction result; the accepted requirements
    /// are also accumulated on the session, and their areas marked explored.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<ExtractionResult, LlmError> {
        let user_message = ConversationMessage::new(MessageRole::User, answer);
        let source_message_id = user_message.id.clone();
        self.state.history.push(user_message);

        let request = [
            ChatMessage::system(EXTRACTION_SYSTEM_PROMPT),
            ChatMessage::user(answer),
        ];
        let response = self.client.chat(&request, &self.options).await?;

        let result = self.extractor.extract(&response.content, &source_message_id);
        debug!(
            raw = result.raw_count,
            accepted = result.filtered_count,
            "extracted requirements from answer"
        );

        for requirement in &result.requirements {
            if let Some(area) = &requirement.area {
                self.mark_area_explored(area);
            }
            self.state.requirements.push(requirement.clone());
        }
        self.state.updated_at = Utc::now();

        if result.filtered_count > 0 {
            info!(
                total = self.state.requirements.len(),
                "session requirement count updated"
            );
        }
        Ok(result)
    }

    /// Track an explored area, lowercased, keeping first-seen order.
    fn mark_area_explored(&mut self, area: &str) {
        let area = area.to_lowercase();
        if !self.state.explored_areas.contains(&area) {
            self.state.explored_areas.push(area);
        }
    }

    /// Persist the session and export accepted requirements.
    pub fn save(&self, session_file: &Path, requirements_file: &Path) -> Result<(), SessionError> {
        self.state.save(session_file)?;
        let json = serde_json::to_string_pretty(&self.state.requirements).map_err(|source| {
            SessionError::EncodeFailed {
                path: requirements_file.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(requirements_file, json).map_err(|source| SessionError::WriteFailed {
            path: requirements_file.to_path_buf(),
            source,
        })
    }
}
