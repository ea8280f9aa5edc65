//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "insole", version, about = "Insole force-mapping sampler")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Optional calibration curve CSV (strict header), overrides [curve] segments
    #[arg(long, value_name = "FILE")]
    pub curve: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); falls back to [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream calibrated, smoothed forces until interrupted
    Run {
        /// Stop after this many lines
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
        /// Print cycle timing stats on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Print the calibrated force for one raw reading
    Convert {
        /// Raw converter count (may be negative or above the 12-bit range)
        #[arg(long, allow_negative_numbers = true)]
        raw: i32,
        /// Channel whose bounds apply (0-based)
        #[arg(long, default_value_t = 0)]
        channel: usize,
    },
    /// Quick health check (converter present, every channel readable)
    SelfCheck,
}
