//! Interview question generation.
//!
//! Builds a system prompt from the conversation so far, delegates to an
//! [`LlmClient`] for the next question, and classifies the result's depth and
//! topic area heuristically. Gap detection compares the fixed list of
//! standard interview areas against what the conversation has already
//! covered.
//!
//! Nothing here persists between calls; classification is a pure function of
//! the per-call [`GenerationContext`].

pub mod prompts;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::GenerationContext;
use crate::errors::LlmError;
use crate::llm::{ChatMessage, ChatOptions, LlmClient};

use prompts::INTERVIEWER_SYSTEM_PROMPT;

/// Standard interview areas, in the order gaps are reported.
pub const STANDARD_AREAS: [&str; 9] = [
    "authentication",
    "authorization",
    "data_model",
    "api",
    "ui_ux",
    "performance",
    "security",
    "integrations",
    "deployment",
];

/// Requirements needed before gap hints are offered.
pub const MIN_REQUIREMENTS_FOR_GAP_HINT: usize = 3;

/// Explored areas needed before gap hints are offered.
pub const MIN_EXPLORED_AREAS_FOR_GAP_HINT: usize = 2;

/// How many trailing requirements are rendered into the system prompt.
const MAX_PROMPT_REQUIREMENTS: usize = 10;

/// How many gaps the hint suffix names.
const MAX_GAP_HINTS: usize = 3;

/// Requirement count above which questions are classified `detailed`.
const DETAILED_REQUIREMENT_THRESHOLD: usize = 5;

/// History length above which questions are classified `clarifying`.
const CLARIFYING_HISTORY_THRESHOLD: usize = 2;

/// Keyword groups for area inference, highest priority first.
///
/// The ordering is deliberate: security outranks data_model so that a
/// question about encrypting stored data classifies as security even though
/// generic data words appear in it. Do not reorder.
const AREA_KEYWORDS: [(&str, &[&str]); 9] = [
    (
        "security",
        &["secur", "encrypt", "protect", "vulnerab", "privacy", "attack"],
    ),
    (
        "authentication",
        &["authenticat", "login", "log in", "sign in", "password", "credential"],
    ),
    (
        "authorization",
        &["authoriz", "permission", "role", "access control"],
    ),
    (
        "performance",
        &["latency", "throughput", "scal", "speed", "slow", "fast"],
    ),
    (
        "integrations",
        &["integrat", "third-party", "third party", "webhook", "external service"],
    ),
    (
        "deployment",
        &["deploy", "hosting", "infrastructure", "docker", "release"],
    ),
    (
        "ui_ux",
        &["interface", "design", "layout", "screen", "usabilit", "user experience"],
    ),
    ("api", &["endpoint", "rest", "graphql", "route"]),
    (
        "data_model",
        &["database", "schema", "storage", "entit", "record", "field"],
    ),
];

/// How deep the generated question drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDepth {
    Broad,
    Detailed,
    Clarifying,
}

impl QuestionDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broad => "broad",
            Self::Detailed => "detailed",
            Self::Clarifying => "clarifying",
        }
    }
}

/// The next interview question, classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQuestion {
    pub question: String,
    /// Inferred topic area, a standard area name or `general`.
    pub area: String,
    pub depth: QuestionDepth,
    /// Id of the user message this question follows up on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows_up: Option<String>,
}

/// Standard areas not yet present in `explored_areas`.
///
/// Matching is case-insensitive and exact after lowercasing; results keep
/// the fixed `STANDARD_AREAS` order regardless of input order. Pure, no
/// side effects.
pub fn detect_gaps(explored_areas: &[String]) -> Vec<&'static str> {
    let explored: Vec<String> = explored_areas
        .iter()
        .map(|area| area.to_lowercase())
        .collect();

    STANDARD_AREAS
        .into_iter()
        .filter(|area| !explored.iter().any(|explored| explored == area))
        .collect()
}

/// Whether the next prompt should nudge the conversation toward a gap.
///
/// True only once the interview has some substance: at least
/// `MIN_REQUIREMENTS_FOR_GAP_HINT` requirements, at least
/// `MIN_EXPLORED_AREAS_FOR_GAP_HINT` explored areas, and at least one
/// standard area still unexplored.
pub fn should_suggest_gap(context: &GenerationContext) -> bool {
    context.extracted_requirements.len() >= MIN_REQUIREMENTS_FOR_GAP_HINT
        && context.explored_areas.len() >= MIN_EXPLORED_AREAS_FOR_GAP_HINT
        && !detect_gaps(&context.explored_areas).is_empty()
}

/// Generates the next interview question through an injected LLM client.
pub struct QuestionGenerator {
    client: Arc<dyn LlmClient>,
    options: ChatOptions,
}

impl QuestionGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            options: ChatOptions::default(),
        }
    }

    /// Use explicit chat options (model, max_tokens) for every request.
    pub fn with_options(client: Arc<dyn LlmClient>, options: ChatOptions) -> Self {
        Self { client, options }
    }

    /// Generate and classify the next question.
    ///
    /// The LLM call is the only suspension point and the only failure path;
    /// provider errors propagate unretried.
    pub async fn generate(
        &self,
        context: &GenerationContext,
    ) -> Result<GeneratedQuestion, LlmError> {
        let system_prompt = build_system_prompt(context);

        let mut messages = Vec::with_capacity(context.history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        for turn in &context.history {
            messages.push(ChatMessage {
                role: turn.role,
                content: turn.content.clone(),
            });
        }

        let response = self.client.chat(&messages, &self.options).await?;

        let depth = classify_depth(context);
        let area = infer_area(&response.content, context);
        debug!(?depth, area, "generated next question");

        Ok(GeneratedQuestion {
            question: response.content,
            area,
            depth,
            follows_up: context.last_user_message_id().map(String::from),
        })
    }
}

/// Compose the system prompt for one generation call.
fn build_system_prompt(context: &GenerationContext) -> String {
    let mut prompt = String::from(INTERVIEWER_SYSTEM_PROMPT);

    if let Some(description) = &context.project_description {
        prompt.push_str("\n\nProject description:\n");
        prompt.push_str(description);
    }

    if !context.extracted_requirements.is_empty() {
        prompt.push_str("\n\nRequirements captured so far:\n");
        let start = context
            .extracted_requirements
            .len()
            .saturating_sub(MAX_PROMPT_REQUIREMENTS);
        for requirement in &context.extracted_requirements[start..] {
            prompt.push_str(&format!(
                "- [{}] {}\n",
                requirement.category, requirement.text
            ));
        }
    }

    if !context.explored_areas.is_empty() {
        prompt.push_str("\nAreas already discussed: ");
        prompt.push_str(&context.explored_areas.join(", "));
        prompt.push('\n');
    }

    if should_suggest_gap(context) {
        let gaps = detect_gaps(&context.explored_areas);
        let hints: Vec<&str> = gaps.into_iter().take(MAX_GAP_HINTS).collect();
        prompt.push_str(&format!(
            "\nNot yet covered: {}. Consider steering your next question toward one of these.\n",
            hints.join(", ")
        ));
    }

    prompt
}

/// Classify question depth from the context alone.
///
/// Tie-break order is fixed: empty history first, then requirement count,
/// then history length.
fn classify_depth(context: &GenerationContext) -> QuestionDepth {
    if context.history.is_empty() {
        QuestionDepth::Broad
    } else if context.extracted_requirements.len() > DETAILED_REQUIREMENT_THRESHOLD {
        QuestionDepth::Detailed
    } else if context.history.len() > CLARIFYING_HISTORY_THRESHOLD {
        QuestionDepth::Clarifying
    } else {
        QuestionDepth::Broad
    }
}

/// Infer the topic area of a generated question.
///
/// Checks standard area names first (underscores spoken as spaces), then the
/// keyword table in priority order, then falls back to the last explored
/// area or `general`.
fn infer_area(response_text: &str, context: &GenerationContext) -> String {
    let lowered = response_text.to_lowercase();

    for area in STANDARD_AREAS {
        let spoken = area.replace('_', " ");
        if lowered.contains(&spoken) {
            return area.to_string();
        }
    }

    for (area, keywords) in AREA_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return area.to_string();
        }
    }

    context
        .last_explored_area()
        .map(String::from)
        .unwrap_or_else(|| "general".to_string())
}
