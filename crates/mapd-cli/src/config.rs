use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// `mapd` - run a multi-agent pickup-and-delivery instance.
///
/// Loads a grid map and a task schedule, runs the selected token-passing
/// coordination algorithm under a wall-clock computation budget, and writes
/// the committed paths and completed deliveries to text files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Input map file.
    #[arg(short, long)]
    pub map: PathBuf,

    /// Input task file.
    #[arg(short, long)]
    pub task: PathBuf,

    /// Coordination algorithm.
    #[arg(short, long, value_enum, default_value = "totp")]
    pub algorithm: Algorithm,

    /// Wall-clock computation budget in milliseconds.  When exceeded the
    /// run is truncated at the earliest in-flight delivery and the outputs
    /// cover the truncated prefix.
    #[arg(short = 'l', long, default_value_t = 1_000.0)]
    pub deadline_ms: f64,

    /// Output file for the per-agent paths.
    #[arg(short = 'p', long, default_value = "path.txt")]
    pub output_path: PathBuf,

    /// Output file for the completed-task records.
    #[arg(short = 'k', long, default_value = "task.txt")]
    pub output_task: PathBuf,

    /// Optional output file for the throughput histogram.
    #[arg(long)]
    pub output_throughput: Option<PathBuf>,

    /// Log progress at info level (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,

    /// Log at debug level and write a debug snapshot (input backups plus
    /// initial agent positions) to the current directory.
    #[arg(short, long)]
    pub debug: bool,
}

/// The two coordination variants.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Claimed tasks leave the shared pool immediately.
    Totp,
    /// Claimed tasks stay visible until physical pickup.
    Tptr,
}
