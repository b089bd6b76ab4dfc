//! Offline extraction over saved model output.

use anyhow::{Context, Result};
use console::style;
use std::io::Read;
use std::path::Path;

use nexus::config::Config;
use nexus::extraction::RequirementExtractor;
use nexus::ui;

/// Run the extractor over a file (or stdin when the path is `-`).
pub fn cmd_extract(
    project_dir: &Path,
    file: &Path,
    threshold: Option<f64>,
    json: bool,
    source_id: Option<&str>,
) -> Result<()> {
    let text = if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read input file: {}", file.display()))?
    };

    // CLI flag wins, then the project config (when resolvable), then default.
    let threshold = match threshold {
        Some(value) => value,
        None => Config::new(project_dir.to_path_buf(), false, None, None)
            .map(|config| config.confidence_threshold())
            .unwrap_or(nexus::extraction::DEFAULT_CONFIDENCE_THRESHOLD),
    };

    let extractor = RequirementExtractor::with_confidence_threshold(threshold);
    let result = extractor.extract(&text, source_id.unwrap_or("cli"));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for requirement in &result.requirements {
        println!("{}", ui::render_requirement(requirement));
    }
    if !result.requirements.is_empty() {
        println!();
    }
    println!(
        "{} of {} parsed requirement(s) accepted at threshold {:.2}",
        result.filtered_count, result.raw_count, threshold
    );
    if result.raw_count == 0 {
        println!(
            "{}",
            style("No requirement blocks found in the input.").dim()
        );
    }

    Ok(())
}
