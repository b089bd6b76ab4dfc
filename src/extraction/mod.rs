//! Requirement extraction from model responses.
//!
//! Interview answers come back from the model as free text with zero or more
//! embedded requirement blocks:
//!
//! ```xml
//! <requirement>
//!   <text>Users must log in with email and password</text>
//!   <category>functional</category>
//!   <priority>must</priority>
//!   <confidence>0.95</confidence>
//!   <area>authentication</area>
//! </requirement>
//! ```
//!
//! Tag order inside a block is irrelevant and surrounding prose (including
//! `<thinking>` blocks) is ignored. Parsing is permissive: a malformed block
//! is dropped silently, never surfaced as an error.

pub mod types;

use regex::Regex;
use tracing::debug;
use uuid::Uuid;

pub use types::{Category, ExtractedRequirement, ExtractionResult, Priority};

/// Confidence assigned when the tag is missing or unparsable.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Threshold a requirement must meet to be accepted.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Parses requirement blocks out of response text and filters them by
/// confidence.
///
/// The threshold is plain instance state; `set_confidence_threshold` takes
/// `&mut self`, so concurrent mutation is ruled out by the borrow checker.
#[derive(Debug)]
pub struct RequirementExtractor {
    confidence_threshold: f64,
    block_re: Regex,
}

impl Default for RequirementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementExtractor {
    /// Create an extractor with the default confidence threshold.
    pub fn new() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            block_re: Regex::new(r"(?s)<requirement>(.*?)</requirement>")
                .expect("requirement block pattern is a valid static regex"),
        }
    }

    /// Create an extractor with an explicit threshold.
    ///
    /// Prefer this over `set_confidence_threshold` when the threshold is
    /// known up front and the extractor is shared across sessions.
    pub fn with_confidence_threshold(threshold: f64) -> Self {
        let mut extractor = Self::new();
        extractor.confidence_threshold = threshold;
        extractor
    }

    /// The threshold applied to subsequent `extract` calls.
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Change the threshold for subsequent calls.
    ///
    /// The argument is not range-checked; callers own keeping it in [0, 1].
    pub fn set_confidence_threshold(&mut self, threshold: f64) {
        self.confidence_threshold = threshold;
    }

    /// Extract all requirements from `response_text`.
    ///
    /// Never fails: malformed blocks are skipped and the worst case is an
    /// empty result. A block missing `<text>` or with a category outside the
    /// closed vocabulary is dropped entirely and counted nowhere; a block
    /// that parses but falls below the threshold counts only toward
    /// `raw_count`.
    pub fn extract(&self, response_text: &str, source_message_id: &str) -> ExtractionResult {
        let mut requirements = Vec::new();
        let mut raw_count = 0;

        for captures in self.block_re.captures_iter(response_text) {
            let block = &captures[1];
            let Some(requirement) = self.parse_block(block, source_message_id) else {
                debug!("dropping malformed requirement block");
                continue;
            };

            raw_count += 1;
            if requirement.confidence >= self.confidence_threshold {
                requirements.push(requirement);
            } else {
                debug!(
                    confidence = requirement.confidence,
                    threshold = self.confidence_threshold,
                    "requirement below confidence threshold"
                );
            }
        }

        debug!(
            raw = raw_count,
            accepted = requirements.len(),
            "extraction complete"
        );
        ExtractionResult::new(requirements, raw_count)
    }

    /// Parse one block body into a requirement shape.
    ///
    /// Returns `None` when the block is malformed (empty text or unmappable
    /// category); those blocks are excluded from the raw count as well.
    fn parse_block(&self, block: &str, source_message_id: &str) -> Option<ExtractedRequirement> {
        let text = tag_value(block, "text")?;
        if text.is_empty() {
            return None;
        }

        let category = Category::parse(&tag_value(block, "category")?)?;

        let priority = tag_value(block, "priority")
            .and_then(|raw| Priority::parse(&raw))
            .unwrap_or_default();

        let confidence = tag_value(block, "confidence")
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| !value.is_nan())
            .unwrap_or(DEFAULT_CONFIDENCE);

        let area = tag_value(block, "area").filter(|value| !value.is_empty());

        Some(ExtractedRequirement {
            id: Uuid::new_v4().to_string(),
            text,
            category,
            priority,
            confidence,
            area,
            source_message_id: source_message_id.to_string(),
        })
    }
}

/// Extract the trimmed content of the first `<tag>...</tag>` pair.
///
/// Returns `None` if either tag is missing.
fn tag_value(block: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{tag}>");
    let end_tag = format!("</{tag}>");

    let start = block.find(&start_tag)?;
    let content_start = start + start_tag.len();
    let end = block[content_start..].find(&end_tag)?;

    Some(block[content_start..content_start + end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn full_block() -> &'static str {
        "<requirement><text>Users must log in with email and password</text>\
         <category>functional</category><priority>must</priority>\
         <confidence>0.95</confidence><area>authentication</area></requirement>"
    }

    // =========================================
    // tag_value tests
    // =========================================

    #[test]
    fn test_tag_value_basic() {
        let block = "<text>  Login required  </text>";
        assert_eq!(tag_value(block, "text"), Some("Login required".to_string()));
    }

    #[test]
    fn test_tag_value_first_match_wins() {
        let block = "<area>auth</area><area>api</area>";
        assert_eq!(tag_value(block, "area"), Some("auth".to_string()));
    }

    #[test]
    fn test_tag_value_missing_tag() {
        assert_eq!(tag_value("<text>hi</text>", "area"), None);
        assert_eq!(tag_value("<area>unclosed", "area"), None);
    }

    // =========================================
    // extract: happy path
    // =========================================

    #[test]
    fn test_extract_full_block() {
        let extractor = RequirementExtractor::new();
        let result = extractor.extract(full_block(), "msg-1");

        assert_eq!(result.raw_count, 1);
        assert_eq!(result.filtered_count, 1);
        let req = &result.requirements[0];
        assert_eq!(req.text, "Users must log in with email and password");
        assert_eq!(req.category, Category::Functional);
        assert_eq!(req.priority, Priority::Must);
        assert_eq!(req.confidence, 0.95);
        assert_eq!(req.area.as_deref(), Some("authentication"));
        assert_eq!(req.source_message_id, "msg-1");
    }

    #[test]
    fn test_extract_multiple_blocks_with_surrounding_prose() {
        let extractor = RequirementExtractor::new();
        let text = format!(
            "<thinking>considering the answer...</thinking>\n\
             Here is what I heard:\n{}\nand also\n\
             <requirement><text>Responses under 200ms</text>\
             <category>non_functional</category><confidence>0.8</confidence></requirement>\n\
             Anything else?",
            full_block()
        );
        let result = extractor.extract(&text, "msg-2");

        assert_eq!(result.raw_count, 2);
        assert_eq!(result.filtered_count, 2);
        assert_eq!(result.requirements[1].category, Category::NonFunctional);
    }

    #[test]
    fn test_extract_tag_order_is_irrelevant() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><confidence>0.9</confidence>\
                    <category>technical</category><text>Use Postgres</text></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.requirements[0].category, Category::Technical);
    }

    #[test]
    fn test_extract_multiline_block() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement>\n  <text>\n    Export data as CSV\n  </text>\n\
                    <category>functional</category>\n<confidence>0.85</confidence>\n</requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].text, "Export data as CSV");
    }

    #[test]
    fn test_extract_ids_are_unique() {
        let extractor = RequirementExtractor::with_confidence_threshold(0.0);
        let text = full_block().repeat(4);
        let result = extractor.extract(&text, "m");

        let ids: HashSet<_> = result.requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    // =========================================
    // extract: drop semantics
    // =========================================

    #[test]
    fn test_extract_missing_text_drops_block_entirely() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><category>functional</category><confidence>0.9</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 0);
        assert!(result.requirements.is_empty());
    }

    #[test]
    fn test_extract_empty_text_drops_block_entirely() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>   </text><category>functional</category></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 0);
    }

    #[test]
    fn test_extract_missing_category_drops_block_entirely() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Something</text><confidence>0.9</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 0);
    }

    #[test]
    fn test_extract_unknown_category_drops_block_entirely() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Something</text><category>wishlist</category></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 0);
    }

    #[test]
    fn test_extract_no_blocks_is_empty_result() {
        let extractor = RequirementExtractor::new();
        let result = extractor.extract("just some prose, no tags at all", "m");
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_unclosed_block_is_ignored() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>dangling</text><category>functional</category>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 0);
    }

    // =========================================
    // extract: defaults
    // =========================================

    #[test]
    fn test_extract_missing_priority_defaults_to_should() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Something</text><category>functional</category>\
                    <confidence>0.9</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].priority, Priority::Should);
    }

    #[test]
    fn test_extract_invalid_priority_defaults_to_should() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Something</text><category>functional</category>\
                    <priority>urgent</priority><confidence>0.9</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].priority, Priority::Should);
    }

    #[test]
    fn test_extract_missing_confidence_defaults() {
        let extractor = RequirementExtractor::with_confidence_threshold(0.5);
        let text = "<requirement><text>Something</text><category>functional</category></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_extract_unparsable_confidence_defaults() {
        let extractor = RequirementExtractor::with_confidence_threshold(0.5);
        for bad in ["high", "NaN", ""] {
            let text = format!(
                "<requirement><text>Something</text><category>functional</category>\
                 <confidence>{bad}</confidence></requirement>"
            );
            let result = extractor.extract(&text, "m");
            assert_eq!(result.requirements[0].confidence, DEFAULT_CONFIDENCE, "input: {bad:?}");
        }
    }

    #[test]
    fn test_extract_absent_area_is_none() {
        let extractor = RequirementExtractor::with_confidence_threshold(0.0);
        let text = "<requirement><text>Something</text><category>functional</category></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].area, None);
    }

    #[test]
    fn test_extract_empty_area_is_none() {
        let extractor = RequirementExtractor::with_confidence_threshold(0.0);
        let text = "<requirement><text>Something</text><category>functional</category>\
                    <area>  </area></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.requirements[0].area, None);
    }

    // =========================================
    // confidence filtering
    // =========================================

    #[test]
    fn test_extract_filters_below_threshold() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Maybe dark mode</text><category>functional</category>\
                    <confidence>0.4</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.raw_count, 1);
        assert_eq!(result.filtered_count, 0);
        assert!(result.requirements.is_empty());
    }

    #[test]
    fn test_extract_threshold_is_inclusive() {
        let extractor = RequirementExtractor::new();
        let text = "<requirement><text>Exactly at threshold</text><category>functional</category>\
                    <confidence>0.7</confidence></requirement>";
        let result = extractor.extract(text, "m");
        assert_eq!(result.filtered_count, 1);
    }

    #[test]
    fn test_lowering_threshold_is_non_decreasing() {
        let text = "<requirement><text>A</text><category>functional</category>\
                    <confidence>0.9</confidence></requirement>\
                    <requirement><text>B</text><category>functional</category>\
                    <confidence>0.6</confidence></requirement>\
                    <requirement><text>C</text><category>functional</category>\
                    <confidence>0.3</confidence></requirement>";

        let mut extractor = RequirementExtractor::new();
        let strict = extractor.extract(text, "m");

        extractor.set_confidence_threshold(0.5);
        let relaxed = extractor.extract(text, "m");

        extractor.set_confidence_threshold(0.0);
        let permissive = extractor.extract(text, "m");

        assert_eq!(strict.filtered_count, 1);
        assert_eq!(relaxed.filtered_count, 2);
        assert_eq!(permissive.filtered_count, 3);
        assert!(strict.filtered_count <= relaxed.filtered_count);
        assert!(relaxed.filtered_count <= permissive.filtered_count);
        assert_eq!(permissive.raw_count, 3);
    }

    #[test]
    fn test_set_confidence_threshold_is_unvalidated() {
        let mut extractor = RequirementExtractor::new();
        extractor.set_confidence_threshold(2.0);
        assert_eq!(extractor.confidence_threshold(), 2.0);

        let result = extractor.extract(full_block(), "m");
        assert_eq!(result.raw_count, 1);
        assert_eq!(result.filtered_count, 0);
    }

    #[test]
    fn test_filtered_count_invariants_hold() {
        let extractor = RequirementExtractor::new();
        let text = format!(
            "{}<requirement><text>Low</text><category>functional</category>\
             <confidence>0.1</confidence></requirement>",
            full_block()
        );
        let result = extractor.extract(&text, "m");
        assert_eq!(result.filtered_count, result.requirements.len());
        assert!(result.filtered_count <= result.raw_count);
    }
}
