//! Core types for requirement extraction.
//!
//! These types represent requirements parsed out of model responses and the
//! per-call result shape handed to downstream consumers.

use serde::{Deserialize, Serialize};

/// Category of an extracted requirement.
///
/// The vocabulary is closed: a block whose `<category>` tag does not map to
/// one of these variants is dropped by the extractor rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Functional,
    NonFunctional,
    Technical,
    Constraint,
    Assumption,
}

impl Category {
    /// Map a raw tag value to a category.
    ///
    /// Input is lower-cased and trimmed before lookup. Both `non_functional`
    /// and `non-functional` map to [`Category::NonFunctional`]; anything
    /// outside the table returns `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "functional" => Some(Self::Functional),
            "non_functional" | "non-functional" => Some(Self::NonFunctional),
            "technical" => Some(Self::Technical),
            "constraint" => Some(Self::Constraint),
            "assumption" => Some(Self::Assumption),
            _ => None,
        }
    }

    /// Kebab-case label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::NonFunctional => "non-functional",
            Self::Technical => "technical",
            Self::Constraint => "constraint",
            Self::Assumption => "assumption",
        }
    }

    /// All categories, in display order.
    pub fn all() -> [Category; 5] {
        [
            Self::Functional,
            Self::NonFunctional,
            Self::Technical,
            Self::Constraint,
            Self::Assumption,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// MoSCoW priority of an extracted requirement.
///
/// Unlike [`Category`], an invalid or missing priority does not drop the
/// block; it falls back to [`Priority::Should`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Must,
    #[default]
    Should,
    Could,
    Wont,
}

impl Priority {
    /// Map a raw tag value to a priority, if it is in the closed vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "must" => Some(Self::Must),
            "should" => Some(Self::Should),
            "could" => Some(Self::Could),
            "wont" => Some(Self::Wont),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::Should => "should",
            Self::Could => "could",
            Self::Wont => "wont",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single requirement parsed from a model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedRequirement {
    /// Unique identifier, generated at extraction time.
    pub id: String,
    /// Free-form requirement description, trimmed and non-empty.
    pub text: String,
    /// Normalized category.
    pub category: Category,
    /// MoSCoW priority (`should` when absent or invalid).
    #[serde(default)]
    pub priority: Priority,
    /// Extraction confidence in [0, 1] (`0.5` when absent or unparsable).
    pub confidence: f64,
    /// Optional domain tag, e.g. `authentication`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Conversation message this requirement was extracted from.
    pub source_message_id: String,
}

/// Result of a single extraction call.
///
/// `raw_count` counts every block that parsed into a valid requirement shape;
/// `requirements` holds only those that met the confidence threshold.
/// Constructed fresh per call and never persisted by the extractor itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Requirements that passed the confidence filter.
    pub requirements: Vec<ExtractedRequirement>,
    /// Valid-shape blocks parsed, before filtering.
    pub raw_count: usize,
    /// Accepted count; always equals `requirements.len()`.
    pub filtered_count: usize,
}

impl ExtractionResult {
    /// Build a result from the accepted set and the pre-filter count.
    pub fn new(requirements: Vec<ExtractedRequirement>, raw_count: usize) -> Self {
        let filtered_count = requirements.len();
        Self {
            requirements,
            raw_count,
            filtered_count,
        }
    }

    /// An extraction that found nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.raw_count == 0
    }
}
