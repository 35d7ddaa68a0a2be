//! CLI module for gpumon
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `watch` - Live dashboard, redrawn on every poll
//! - `jobs` - Filtered job table
//! - `gpu` - GPU occupancy and current job output
//! - `logs` - Runner log for one day
//! - `clean-logs` - Remove runner logs past the retention window
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch a remote scheduler, only failed jobs
//! gpumon --url http://gpu-box:8000 watch --status failed
//!
//! # Jobs created in March as JSON
//! gpumon jobs --start 2024-03-01 --end 2024-03-31 --json
//! ```

pub mod clean;
pub mod completions;
pub mod config;
pub mod context;
pub mod gpu;
pub mod jobs;
pub mod logs;
pub mod output;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::view::JobFilter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gpumon - GPU job queue monitor
#[derive(Parser, Debug)]
#[command(
    name = "gpumon",
    version,
    about = "Terminal monitor for a GPU job queue"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "gpumon.toml")]
    pub config: PathBuf,

    /// Override the scheduler base URL
    #[arg(long, global = true, env = "GPUMON_URL")]
    pub url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "GPUMON_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Live dashboard
    Watch(WatchArgs),
    /// List jobs
    Jobs(JobsArgs),
    /// Show GPU status and current job output
    Gpu(GpuArgs),
    /// Show the job runner log
    Logs(LogsArgs),
    /// Remove runner logs older than the retention window
    CleanLogs(CleanLogsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Job filter flags shared by `watch` and `jobs`.
#[derive(Args, Debug, Clone, Default)]
pub struct JobFilterArgs {
    /// Only jobs with this status (exact match)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Only jobs created at or after this date
    #[arg(long)]
    pub start: Option<String>,

    /// Only jobs created at or before this date
    #[arg(long)]
    pub end: Option<String>,
}

impl JobFilterArgs {
    pub fn to_filter(&self) -> JobFilter {
        JobFilter {
            status: self.status.clone().unwrap_or_default(),
            start_date: self.start.clone().unwrap_or_default(),
            end_date: self.end.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filter: JobFilterArgs,

    /// Runner log day to show (remembered for next time)
    #[arg(long)]
    pub log_index: Option<usize>,
}

#[derive(Args, Debug)]
pub struct JobsArgs {
    #[command(flatten)]
    pub filter: JobFilterArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GpuArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Select and remember this day
    #[arg(short, long)]
    pub index: Option<usize>,

    /// List available days instead of showing one
    #[arg(long)]
    pub list: bool,
}

#[derive(Args, Debug)]
pub struct CleanLogsArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Run even when the log history is within the retention window
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "gpumon.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
