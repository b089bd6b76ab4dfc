use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nexus::nexus_config::LlmProvider;

mod cmd;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(version, about = "Requirements interview engine")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new nexus project
    Init,
    /// Run the interactive requirements interview
    Interview {
        /// Chat backend: claude-cli or anthropic
        #[arg(long)]
        provider: Option<LlmProvider>,
    },
    /// Extract requirements from saved model output (use '-' for stdin)
    Extract {
        /// File containing model output
        file: PathBuf,
        /// Confidence threshold override (default from config)
        #[arg(long)]
        threshold: Option<f64>,
        /// Emit the extraction result as JSON
        #[arg(long)]
        json: bool,
        /// Source message id recorded on each requirement
        #[arg(long)]
        source_id: Option<String>,
    },
    /// Show unexplored standard interview areas
    Gaps {
        /// Emit the gap list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show interview session status
    Status,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default nexus.toml file
    Init,
}

/// Install the tracing subscriber.
///
/// Console output goes to stderr at `warn` (or `debug` with `-v`,
/// `NEXUS_LOG` overriding both); interview runs also log to a daily file
/// under `.nexus/logs/`. The returned guard must stay alive for the file
/// writer to flush.
fn init_tracing(
    verbose: bool,
    log_dir: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("NEXUS_LOG").unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "nexus=debug" } else { "warn" })
    });
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter).with(stderr_layer);

    match log_dir {
        Some(log_dir) => {
            let appender = tracing_appender::rolling::daily(log_dir, "nexus.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // Interview runs keep a file log next to the session.
    let log_dir = match &cli.command {
        Commands::Interview { .. } if nexus::init::is_initialized(&project_dir) => {
            let log_dir = nexus::init::get_nexus_dir(&project_dir).join("logs");
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
            Some(log_dir)
        }
        _ => None,
    };
    let _guard = init_tracing(cli.verbose, log_dir.as_deref());

    match &cli.command {
        Commands::Init => cmd::cmd_init(&project_dir)?,
        Commands::Interview { provider } => {
            cmd::cmd_interview(&project_dir, cli.verbose, *provider).await?
        }
        Commands::Extract {
            file,
            threshold,
            json,
            source_id,
        } => cmd::cmd_extract(&project_dir, file, *threshold, *json, source_id.as_deref())?,
        Commands::Gaps { json } => cmd::cmd_gaps(&project_dir, *json)?,
        Commands::Status => cmd::cmd_status(&project_dir)?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
    }

    Ok(())
}
