//! CLI parse: clap types for reelflow. No behavior; definitions only.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// reelflow - staged short-video content pipeline with QC and curator gates
#[derive(Parser)]
#[command(name = "reelflow")]
#[command(about = "Run the short-video content pipeline up to the curator gate and resume after it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a full run up to the curator gate
    Run {
        /// Run date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Run slug
        #[arg(long, default_value = "run")]
        slug: String,
        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },
    /// Resume a run after the curator decision has been filled in
    Resume {
        /// Run directory
        run_dir: PathBuf,
        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },
    /// Show a run's state, history, outputs and gates
    Status {
        /// Run directory
        run_dir: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate a file against the artifact contracts
    Validate {
        /// Artifact key, e.g. scripts or qc_report
        artifact_key: String,
        /// File to validate
        file: PathBuf,
    },
    /// Scaffold a starter project next to the config file
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
        /// List the files that would be created
        #[arg(long)]
        list: bool,
    },
}

impl Commands {
    /// Stable command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run { .. } => "run",
            Commands::Resume { .. } => "resume",
            Commands::Status { .. } => "status",
            Commands::Validate { .. } => "validate",
            Commands::Init { .. } => "init",
        }
    }
}
