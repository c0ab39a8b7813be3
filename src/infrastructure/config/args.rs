//! Command-line arguments.

use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments, layered over the config file.
#[derive(Debug, Parser)]
#[command(
    name = "shelfwarm",
    version,
    about = "Warm the image cache for marketplace categories",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend project URL.
    #[arg(long, env = "SHELFWARM_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend public API key.
    #[arg(long, env = "SHELFWARM_ANON_KEY", hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Image cache directory.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Category to warm (label or slug). Repeatable; all categories when omitted.
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Warm the neighbours of this category instead.
    #[arg(long, value_name = "CATEGORY", conflicts_with = "categories")]
    pub adjacent: Option<String>,

    /// Pause between batches.
    #[arg(long)]
    pub background: bool,
}
