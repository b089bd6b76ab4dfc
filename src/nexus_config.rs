//! Unified configuration for Nexus.
//!
//! Reads `.nexus/nexus.toml` with layering: file → environment → CLI flags.
//! A user-level file at `~/.config/nexus/nexus.toml` is used when the
//! project has none.
//!
//! # Configuration File Format
//!
//! ```toml
//! [project]
//! name = "my-project"
//! description = "A todo app for small teams"
//!
//! [extraction]
//! confidence_threshold = 0.7
//!
//! [llm]
//! provider = "claude-cli"
//! model = "claude-sonnet-4-20250514"
//! max_tokens = 1024
//! claude_cmd = "claude"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::extraction::DEFAULT_CONFIDENCE_THRESHOLD;

/// File name inside the `.nexus/` directory.
pub const CONFIG_FILE: &str = "nexus.toml";

/// Environment overrides, applied after the file layer.
pub const PROVIDER_ENV: &str = "NEXUS_PROVIDER";
pub const MODEL_ENV: &str = "NEXUS_MODEL";
pub const CLAUDE_CMD_ENV: &str = "NEXUS_CLAUDE_CMD";
pub const THRESHOLD_ENV: &str = "NEXUS_CONFIDENCE_THRESHOLD";

/// Which chat backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LlmProvider {
    /// Spawn the Claude CLI (default; no API key needed).
    #[default]
    ClaudeCli,
    /// Call the Anthropic Messages API directly.
    Anthropic,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::ClaudeCli => write!(f, "claude-cli"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude-cli" | "claude_cli" | "claude" => Ok(LlmProvider::ClaudeCli),
            "anthropic" | "api" => Ok(LlmProvider::Anthropic),
            _ => anyhow::bail!(
                "Invalid provider '{}'. Valid values: claude-cli, anthropic",
                s
            ),
        }
    }
}

/// Project-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (optional, defaults to directory name in displays).
    #[serde(default)]
    pub name: Option<String>,
    /// One-paragraph description rendered into interview prompts.
    #[serde(default)]
    pub description: Option<String>,
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum confidence for a requirement to be accepted.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

/// LLM backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name passed to the backend; backend default when absent.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Claude CLI command (default: "claude").
    #[serde(default = "default_claude_cmd")]
    pub claude_cmd: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            max_tokens: default_max_tokens(),
            claude_cmd: default_claude_cmd(),
        }
    }
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_claude_cmd() -> String {
    "claude".to_string()
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NexusToml {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl NexusToml {
    /// Load from `<nexus_dir>/nexus.toml`, falling back to the user-level
    /// file, then to defaults. Environment overrides are applied last.
    pub fn load_or_default(nexus_dir: &Path) -> Result<Self> {
        let mut config = match Self::first_existing_file(nexus_dir) {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config at {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn first_existing_file(nexus_dir: &Path) -> Option<std::path::PathBuf> {
        let project_file = nexus_dir.join(CONFIG_FILE);
        if project_file.exists() {
            return Some(project_file);
        }
        let user_file = dirs::config_dir()?.join("nexus").join(CONFIG_FILE);
        user_file.exists().then_some(user_file)
    }

    /// Apply `NEXUS_*` environment overrides on top of the file layer.
    fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var(PROVIDER_ENV)
            && let Ok(parsed) = provider.parse()
        {
            self.llm.provider = parsed;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            self.llm.model = Some(model);
        }
        if let Ok(cmd) = std::env::var(CLAUDE_CMD_ENV) {
            self.llm.claude_cmd = cmd;
        }
        if let Ok(threshold) = std::env::var(THRESHOLD_ENV)
            && let Ok(parsed) = threshold.parse::<f64>()
        {
            self.extraction.confidence_threshold = parsed;
        }
    }

    /// Non-fatal configuration warnings.
    ///
    /// The threshold itself stays unvalidated at the extractor (matching its
    /// permissive contract); this only surfaces suspicious values to
    /// `nexus config validate`.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let threshold = self.extraction.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            warnings.push(format!(
                "extraction.confidence_threshold = {threshold} is outside [0, 1]; \
                 every parsed requirement will be {}",
                if threshold <= 0.0 { "accepted" } else { "filtered out" }
            ));
        }
        if self.llm.max_tokens == 0 {
            warnings.push("llm.max_tokens = 0 will reject every request".to_string());
        }
        warnings
    }

    /// Template written by `nexus init` / `nexus config init`.
    pub fn default_toml() -> &'static str {
        r#"# Nexus configuration

[project]
# name = "my-project"
# description = "One paragraph about what you are building"

[extraction]
confidence_threshold = 0.7

[llm]
# provider: claude-cli (spawns the claude binary) or anthropic (Messages API)
provider = "claude-cli"
# model = "claude-sonnet-4-20250514"
max_tokens = 1024
claude_cmd = "claude"
"#
    }
}
