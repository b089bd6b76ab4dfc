//! Console presentation helpers for the interview CLI.

pub mod icons;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{Width, terminal_size};

use crate::extraction::ExtractedRequirement;
use crate::question::GeneratedQuestion;

/// Spinner shown while waiting on the model.
///
/// The caller owns finishing/clearing it.
pub fn thinking_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("spinner template is a valid static string"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Wrap question text to the terminal width (capped at 80 columns).
pub fn wrap_question(text: &str) -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(80)
        .min(80);
    textwrap::fill(text, width)
}

/// Render the generated question with its classification line.
pub fn render_question(question: &GeneratedQuestion) -> String {
    format!(
        "{}{}\n  {}\n",
        icons::QUESTION,
        wrap_question(&question.question),
        style(format!("[{} · {}]", question.depth.as_str(), question.area)).dim()
    )
}

/// One-line summary of an accepted requirement.
pub fn render_requirement(requirement: &ExtractedRequirement) -> String {
    let area = requirement
        .area
        .as_deref()
        .map(|area| format!(", area: {area}"))
        .unwrap_or_default();
    format!(
        "{}{} {} {}",
        icons::REQUIREMENT,
        style(format!("[{}]", requirement.priority)).bold(),
        requirement.text,
        style(format!(
            "({}, confidence {:.2}{area})",
            requirement.category, requirement.confidence
        ))
        .dim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Category, Priority};
    use crate::question::QuestionDepth;

    fn requirement() -> ExtractedRequirement {
        ExtractedRequirement {
            id: "r1".to_string(),
            text: "Users must log in".to_string(),
            category: Category::Functional,
            priority: Priority::Must,
            confidence: 0.95,
            area: Some("authentication".to_string()),
            source_message_id: "m1".to_string(),
        }
    }

    #[test]
    fn test_render_requirement_includes_fields() {
        let line = render_requirement(&requirement());
        assert!(line.contains("Users must log in"));
        assert!(line.contains("[must]"));
        assert!(line.contains("functional"));
        assert!(line.contains("0.95"));
        assert!(line.contains("authentication"));
    }

    #[test]
    fn test_render_requirement_without_area() {
        let mut req = requirement();
        req.area = None;
        let line = render_requirement(&req);
        assert!(!line.contains("area:"));
    }

    #[test]
    fn test_render_question_shows_classification() {
        let question = GeneratedQuestion {
            question: "How do users sign in?".to_string(),
            area: "authentication".to_string(),
            depth: QuestionDepth::Broad,
            follows_up: None,
        };
        let rendered = render_question(&question);
        assert!(rendered.contains("How do users sign in?"));
        assert!(rendered.contains("broad"));
        assert!(rendered.contains("authentication"));
    }

    #[test]
    fn test_wrap_question_wraps_long_lines() {
        let long = "word ".repeat(40);
        let wrapped = wrap_question(&long);
        assert!(wrapped.lines().count() > 1);
        assert!(wrapped.lines().all(|line| line.len() <= 80));
    }
}
