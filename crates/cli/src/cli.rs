//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Batch Fetcher - Bounded concurrent fetch pipeline for REST services
#[derive(Parser, Debug)]
#[command(
    name = "batch-fetcher",
    author,
    version,
    about = "Bounded concurrent fetch pipeline",
    long_about = "A bounded concurrent fetch pipeline for REST services.\n\n\
                  Loads a plan of fetch targets, issues the requests against a \n\
                  fixed concurrency budget, and reports one outcome per target \n\
                  in plan order."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BATCH_FETCHER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BATCH_FETCHER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fetch plan
    Run(RunArgs),

    /// Validate a plan file without running
    Validate(ValidateArgs),

    /// Display plan information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to plan file (TOML or JSON)
    #[arg(short, long, default_value = "plan.toml", env = "BATCH_FETCHER_PLAN")]
    pub plan: PathBuf,

    /// Override the plan's concurrency budget
    #[arg(long, env = "MAX_CONCURRENT_REQUESTS")]
    pub max_concurrent: Option<usize>,

    /// Override the plan's batch deadline in seconds (0 = no deadline)
    #[arg(long, env = "TIMEOUT_SECONDS")]
    pub timeout: Option<u64>,

    /// Validate the plan and exit without fetching
    #[arg(long)]
    pub dry_run: bool,

    /// Write per-target outcomes as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "BATCH_FETCHER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to plan file to validate
    #[arg(short, long, default_value = "plan.toml")]
    pub plan: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to plan file
    #[arg(short, long, default_value = "plan.toml")]
    pub plan: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed target information
    #[arg(long)]
    pub targets: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
