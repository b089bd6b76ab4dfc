//! Initialization for nexus projects.
//!
//! `nexus init` creates the `.nexus/` directory structure:
//!
//! ```text
//! .nexus/
//! ├── nexus.toml         # Configuration (template on first init)
//! ├── session.json       # Interview session (written by `nexus interview`)
//! ├── requirements.json  # Accepted requirements export
//! └── logs/              # Interview logs
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::nexus_config::{CONFIG_FILE, NexusToml};

/// The name of the nexus configuration directory.
pub const NEXUS_DIR: &str = ".nexus";

/// Result of initializing a nexus project.
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created .nexus directory
    pub nexus_dir: PathBuf,
    /// Whether the directory was newly created (false if it already existed)
    pub created: bool,
}

pub fn get_nexus_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(NEXUS_DIR)
}

pub fn is_initialized(project_dir: &Path) -> bool {
    get_nexus_dir(project_dir).is_dir()
}

pub fn has_session(project_dir: &Path) -> bool {
    get_nexus_dir(project_dir).join("session.json").exists()
}

/// Initialize a nexus project in the given directory.
///
/// Idempotent: an existing `.nexus/` directory is completed rather than
/// overwritten, and an existing `nexus.toml` is left untouched.
pub fn init_project(project_dir: &Path) -> Result<InitResult> {
    let nexus_dir = get_nexus_dir(project_dir);
    let created = !nexus_dir.exists();

    std::fs::create_dir_all(&nexus_dir)
        .with_context(|| format!("Failed to create directory: {}", nexus_dir.display()))?;
    ensure_directory_structure(&nexus_dir)?;

    Ok(InitResult { nexus_dir, created })
}

/// Ensure required subdirectories and the config template exist.
fn ensure_directory_structure(nexus_dir: &Path) -> Result<()> {
    let log_dir = nexus_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let config_file = nexus_dir.join(CONFIG_FILE);
    if !config_file.exists() {
        std::fs::write(&config_file, NexusToml::default_toml())
            .with_context(|| format!("Failed to write config template: {}", config_file.display()))?;
    }

    Ok(())
}
