//! Project initialization and the interactive interview loop.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use nexus::config::Config;
use nexus::init::{init_project, is_initialized};
use nexus::interview::{InterviewSession, SessionState};
use nexus::nexus_config::LlmProvider;
use nexus::ui;
use nexus::ui::icons::{CHECK, GAP, SPARKLE};

pub fn cmd_init(project_dir: &Path) -> Result<()> {
    let was_initialized = is_initialized(project_dir);
    let result = init_project(project_dir)?;

    if result.created {
        println!("Initialized nexus project at {}", result.nexus_dir.display());
        println!();
        println!("Created directory structure:");
        println!("  .nexus/");
        println!("  ├── nexus.toml          # Configuration");
        println!("  ├── session.json        # Interview session (created on first run)");
        println!("  ├── requirements.json   # Accepted requirements export");
        println!("  └── logs/               # Interview logs");
        println!();
        println!("Next steps:");
        println!("  1. Optionally edit .nexus/nexus.toml (provider, model, threshold)");
        println!("  2. Run `nexus interview` to start gathering requirements");
    } else if was_initialized {
        println!(
            "Nexus project already initialized at {}",
            result.nexus_dir.display()
        );
        println!("Directory structure verified.");
    } else {
        println!(
            "Completed nexus initialization at {}",
            result.nexus_dir.display()
        );
    }

    Ok(())
}

/// Run the interactive interview loop.
///
/// Each round asks the model for the next question, reads the user's answer,
/// extracts its requirements, and saves the session. An empty answer or
/// `done` ends the interview.
pub async fn cmd_interview(
    project_dir: &Path,
    verbose: bool,
    provider: Option<LlmProvider>,
) -> Result<()> {
    if !is_initialized(project_dir) {
        anyhow::bail!("Project not initialized. Run 'nexus init' first.");
    }

    let config = Config::new(project_dir.to_path_buf(), verbose, provider, None)?;
    config.ensure_directories()?;
    let client = config.build_client()?;

    let state = if config.session_file.exists() {
        SessionState::load(&config.session_file)?
    } else {
        SessionState::new(config.project_description().map(String::from))
    };
    let resumed = !state.history.is_empty();

    let mut session = InterviewSession::resume(
        state,
        client,
        config.confidence_threshold(),
        config.chat_options(),
    );

    if resumed {
        println!(
            "Resuming interview for {} ({} requirement(s) so far).",
            config.project_name(),
            session.state().requirements.len()
        );
    } else {
        println!("Starting requirements interview for {}.", config.project_name());
    }
    println!(
        "{}",
        style("Answer each question; enter an empty line or 'done' to finish.").dim()
    );
    println!();

    loop {
        let spinner = ui::thinking_spinner("Thinking of the next question...");
        let question = session.next_question().await;
        spinner.finish_and_clear();
        let question = question.context("Question generation failed")?;

        println!("{}", ui::render_question(&question));

        let answer: String = dialoguer::Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read answer")?;
        let answer = answer.trim().to_string();
        if answer.is_empty() || answer.eq_ignore_ascii_case("done") {
            break;
        }

        let spinner = ui::thinking_spinner("Extracting requirements...");
        let result = session.submit_answer(&answer).await;
        spinner.finish_and_clear();
        let result = result.context("Requirement extraction failed")?;

        for requirement in &result.requirements {
            println!("{}", ui::render_requirement(requirement));
        }
        let below_threshold = result.raw_count - result.filtered_count;
        if below_threshold > 0 {
            println!(
                "{}",
                style(format!(
                    "({below_threshold} requirement(s) below the confidence threshold)"
                ))
                .dim()
            );
        }
        println!();

        session.save(&config.session_file, &config.requirements_file)?;
    }

    session.save(&config.session_file, &config.requirements_file)?;
    let state = session.state();

    println!();
    println!(
        "{}Interview saved: {} turn(s), {} requirement(s).",
        CHECK,
        state.history.len(),
        state.requirements.len()
    );
    let gaps = state.gaps();
    if gaps.is_empty() {
        println!("{}All standard areas covered.", SPARKLE);
    } else {
        println!("{}Unexplored areas: {}", GAP, gaps.join(", "));
    }
    println!("Requirements exported to {}", config.requirements_file.display());

    Ok(())
}
