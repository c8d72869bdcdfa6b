use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "gallery-loader",
    version,
    about = "Resolve and load gallery images through the format-fallback pipeline",
    long_about = None
)]
pub struct CliArgs {
    /// Canonical image paths to load.
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Base URL relative paths are fetched from.
    #[arg(short, long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-candidate timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum cached sources.
    #[arg(long, value_name = "N")]
    pub cache_capacity: Option<usize>,

    /// Print the candidate list for each path without fetching.
    #[arg(long)]
    pub resolve_only: bool,
}
