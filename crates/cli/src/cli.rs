//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Batch Dispatch - run queue message batches through the dispatcher locally
#[derive(Parser, Debug)]
#[command(
    name = "batch-dispatch",
    author,
    version,
    about = "Local runner for the batch message dispatcher",
    long_about = "Dispatches batch files through the message dispatcher with simulated handlers \n\
                  and prints one partial failure report (JSON) per batch."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BATCH_DISPATCH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BATCH_DISPATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one or more batch files
    Run(RunArgs),

    /// Validate a settings file
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Batch files: a JSON array of {id, body} or a queue event with "Records"
    #[arg(short, long, required = true, num_args = 1..)]
    pub batch: Vec<PathBuf>,

    /// Settings file (TOML or JSON); defaults are used when absent
    #[arg(short, long, env = "BATCH_PROCESSOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the concurrency limit from settings
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Time budget per batch in milliseconds (0 = unbounded)
    #[arg(long, default_value = "0")]
    pub timeout_ms: u64,

    /// Request id prefix used in logs
    #[arg(long, default_value = "local")]
    pub request_id: String,

    /// Disable simulated handler latency
    #[arg(long)]
    pub no_delay: bool,

    /// Print an aggregated summary to stderr after all batches
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Settings file to validate
    #[arg(short, long, default_value = "processor.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
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
