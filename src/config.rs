use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::{AnthropicClient, ChatOptions, ClaudeCliClient, LlmClient};
use crate::nexus_config::{LlmProvider, NexusToml};

/// Runtime configuration for Nexus.
///
/// Bridges the layered `NexusToml` with the runtime needs of the commands:
/// resolved paths under `.nexus/`, the effective confidence threshold, and
/// construction of the configured chat backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub nexus_dir: PathBuf,
    pub session_file: PathBuf,
    pub requirements_file: PathBuf,
    pub log_dir: PathBuf,
    pub verbose: bool,
    toml: NexusToml,
    provider_override: Option<LlmProvider>,
    threshold_override: Option<f64>,
}

impl Config {
    /// Resolve configuration for `project_dir`.
    ///
    /// CLI overrides win over environment and file layers.
    pub fn new(
        project_dir: PathBuf,
        verbose: bool,
        provider_override: Option<LlmProvider>,
        threshold_override: Option<f64>,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let nexus_dir = crate::init::get_nexus_dir(&project_dir);
        let toml = NexusToml::load_or_default(&nexus_dir)?;

        Ok(Self {
            session_file: nexus_dir.join("session.json"),
            requirements_file: nexus_dir.join("requirements.json"),
            log_dir: nexus_dir.join("logs"),
            project_dir,
            nexus_dir,
            verbose,
            toml,
            provider_override,
            threshold_override,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.log_dir).context("Failed to create log directory")?;
        Ok(())
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider_override.unwrap_or(self.toml.llm.provider)
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.threshold_override
            .unwrap_or(self.toml.extraction.confidence_threshold)
    }

    pub fn claude_cmd(&self) -> &str {
        &self.toml.llm.claude_cmd
    }

    pub fn project_description(&self) -> Option<&str> {
        self.toml.project.description.as_deref()
    }

    pub fn project_name(&self) -> String {
        self.toml.project.name.clone().unwrap_or_else(|| {
            self.project_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// The underlying parsed file, for `nexus config show`.
    pub fn toml(&self) -> &NexusToml {
        &self.toml
    }

    /// Chat options applied to every LLM request.
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.toml.llm.model.clone(),
            max_tokens: Some(self.toml.llm.max_tokens),
            temperature: None,
        }
    }

    /// Construct the configured chat backend.
    pub fn build_client(&self) -> Result<Arc<dyn LlmClient>> {
        let client: Arc<dyn LlmClient> = match self.provider() {
            LlmProvider::ClaudeCli => Arc::new(ClaudeCliClient::new(self.claude_cmd())),
            LlmProvider::Anthropic => {
                Arc::new(AnthropicClient::from_env(self.toml.llm.model.clone())?)
            }
        };
        Ok(client)
    }
}
