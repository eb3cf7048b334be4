//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Terminal working time tracker.
///
/// Type clock-in and clock-out times (`730`, `7:30`, `1215`) and watch the
/// running total, projected finish and overtime against a daily target.
#[derive(Debug, Parser)]
#[command(name = "timely", version, about, long_about = None)]
pub struct Cli {
    /// Daily target, e.g. `8`, `0800` or `7:42` (overrides the config file).
    pub target: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not seed the day with the system boot time.
    #[arg(long)]
    pub no_boot_probe: bool,
}
