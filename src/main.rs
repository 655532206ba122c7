//! Binary entry point for recollect.
//!
//! This binary provides the CLI interface for the recollect memory system.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recollect::cli::{self, OutputFormat, RecallArgs};
use recollect::config::RecollectConfig;
use recollect::observability::{self, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Recollect - workspace-aware memory recall for AI coding assistants.
#[derive(Parser)]
#[command(name = "recollect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Search memory notes ranked by relevance.
    Recall {
        /// The search query.
        query: String,

        /// Scope: project, workspace, or global.
        #[arg(short, long, default_value = "project")]
        scope: String,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity threshold (0.0 to 1.0).
        #[arg(long)]
        min_score: Option<f32>,

        /// Filter by category; repeat for several.
        #[arg(short, long = "kind")]
        kinds: Vec<String>,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the merged memory view for a project.
    Show {
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the memory roots a project inherits from.
    Roots {
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Recall memories describing the current project.
    Context {
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(LoggingConfig::from_env(cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: RecollectConfig) -> Result<()> {
    match cli.command {
        Commands::Recall {
            query,
            scope,
            limit,
            min_score,
            kinds,
            format,
            dir,
        } => {
            cli::cmd_recall(
                &config,
                RecallArgs {
                    query,
                    scope: cli::parse_scope(&scope)?,
                    limit,
                    min_score,
                    kinds,
                    format: format.parse::<OutputFormat>()?,
                    dir,
                },
            )
            .await
        },

        Commands::Show { dir, format } => {
            cli::cmd_show(&config, dir, format.parse::<OutputFormat>()?).await
        },

        Commands::Roots { dir } => cli::cmd_roots(&config, dir).await,

        Commands::Context { dir, format } => {
            cli::cmd_context(&config, dir, format.parse::<OutputFormat>()?).await
        },

        Commands::Config { show } => cli::cmd_config(&config, show),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<RecollectConfig> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return RecollectConfig::load_from_file(std::path::Path::new(config_path))
            .with_context(|| format!("loading configuration from {config_path}"));
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("RECOLLECT_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return RecollectConfig::load_from_file(std::path::Path::new(&config_path))
                .with_context(|| format!("loading configuration from {config_path}"));
        }
    }

    // Otherwise, load from default location
    Ok(RecollectConfig::load_default())
}
