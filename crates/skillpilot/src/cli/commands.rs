//! CLI structure and argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gamified coding quests on the command line.
#[derive(Debug, Parser)]
#[command(name = "skillpilot")]
#[command(about = "Work through coding quests one step at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a curriculum file and report skipped projects
    Validate {
        /// Path to the curriculum JSON file
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ValidationOutputFormat::Human)]
        format: ValidationOutputFormat,
    },

    /// List the projects of a curriculum
    Projects {
        /// Path to the curriculum JSON file
        path: PathBuf,
    },

    /// Start an interactive session on one project
    Play {
        /// Path to the curriculum JSON file
        path: PathBuf,

        /// Project to play
        #[arg(short, long)]
        project: String,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for saved progress (overrides the configuration)
        #[arg(long)]
        state_dir: Option<PathBuf>,

        /// Seed for reproducible completion checks
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationOutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Output format for logs written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text lines
    Text,
    /// One JSON object per line
    Json,
}
