//! Session inspection - `nexus status` and `nexus gaps`.

use anyhow::Result;
use console::style;
use std::path::Path;

use nexus::config::Config;
use nexus::conversation::GenerationContext;
use nexus::interview::SessionState;
use nexus::question::{STANDARD_AREAS, detect_gaps, should_suggest_gap};
use nexus::ui::icons::{CHECK, GAP};

pub fn cmd_status(project_dir: &Path) -> Result<()> {
    let config = Config::new(project_dir.to_path_buf(), false, None, None)?;
    let state = SessionState::load(&config.session_file)?;

    println!("Interview status for {}", config.project_name());
    println!("  Started:      {}", state.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  Last update:  {}", state.updated_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  Turns:        {}", state.history.len());
    println!("  Requirements: {}", state.requirements.len());

    for (category, count) in state.category_counts() {
        println!("    {category}: {count}");
    }

    if state.explored_areas.is_empty() {
        println!("  Explored areas: none yet");
    } else {
        println!("  Explored areas: {}", state.explored_areas.join(", "));
    }

    let context = GenerationContext {
        history: state.history.clone(),
        extracted_requirements: state.requirements.clone(),
        explored_areas: state.explored_areas.clone(),
        project_description: state.project_description.clone(),
    };
    if should_suggest_gap(&context) {
        let gaps = detect_gaps(&state.explored_areas);
        println!(
            "  {}Next questions will steer toward: {}",
            GAP,
            gaps[..gaps.len().min(3)].join(", ")
        );
    }

    Ok(())
}

/// Print explored and unexplored standard areas.
///
/// Without a saved session every standard area is a gap.
pub fn cmd_gaps(project_dir: &Path, json: bool) -> Result<()> {
    let config = Config::new(project_dir.to_path_buf(), false, None, None)?;
    let explored_areas = match SessionState::load(&config.session_file) {
        Ok(state) => state.explored_areas,
        Err(_) => Vec::new(),
    };
    let gaps = detect_gaps(&explored_areas);

    if json {
        println!("{}", serde_json::to_string_pretty(&gaps)?);
        return Ok(());
    }

    for area in STANDARD_AREAS {
        if gaps.contains(&area) {
            println!("{}{}", GAP, area);
        } else {
            println!("{}{}", CHECK, style(area).dim());
        }
    }
    println!();
    println!("{} of {} standard areas unexplored", gaps.len(), STANDARD_AREAS.len());

    Ok(())
}
