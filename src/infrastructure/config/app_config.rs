//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::PreloadConfig;
use crate::application::services::{
    DEFAULT_BATCH_SIZE, DEFAULT_LARGE_WIDTH, DEFAULT_MAX_ITEMS, DEFAULT_QUALITY,
    DEFAULT_THUMBNAIL_WIDTH,
};
use crate::infrastructure::backend::DEFAULT_ITEMS_TABLE;
use crate::infrastructure::image::PrefetcherConfig;
use crate::infrastructure::image::disk_cache::DEFAULT_MAX_CACHE_SIZE;
use crate::infrastructure::image::fetched_set::DEFAULT_FETCHED_CAPACITY;

pub(crate) const APP_NAME: &str = "shelfwarm";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend connection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Preload tuning.
    #[serde(default)]
    pub preload: PreloadSettings,

    /// Local image cache.
    #[serde(default)]
    pub image_cache: ImageCacheConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL.
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key.
    #[serde(default)]
    pub anon_key: String,

    /// Table holding preloadable items.
    #[serde(default = "default_items_table")]
    pub items_table: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            items_table: default_items_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Preload tuning as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloadSettings {
    /// Maximum items read per category.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// URLs prefetched concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between background batches, in milliseconds.
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Width of the thumbnail variant.
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    /// Width of the large variant.
    #[serde(default = "default_large_width")]
    pub large_width: u32,

    /// Quality of both variants.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause_ms: default_batch_pause_ms(),
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            large_width: DEFAULT_LARGE_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PreloadSettings {
    /// Converts into the service configuration.
    #[must_use]
    pub fn to_preload_config(&self) -> PreloadConfig {
        PreloadConfig {
            max_items: self.max_items,
            batch_size: self.batch_size.max(1),
            batch_pause: Duration::from_millis(self.batch_pause_ms),
            thumbnail_width: self.thumbnail_width,
            large_width: self.large_width,
            quality: self.quality.min(100),
        }
    }
}

/// Local image cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCacheConfig {
    /// Cache directory; platform cache dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Maximum bytes kept on disk.
    #[serde(default = "default_max_disk_bytes")]
    pub max_disk_bytes: u64,

    /// Maximum URLs remembered as fetched.
    #[serde(default = "default_fetched_set_size")]
    pub fetched_set_size: usize,

    /// Maximum concurrent downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,

    /// Download timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_disk_bytes: default_max_disk_bytes(),
            fetched_set_size: default_fetched_set_size(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ImageCacheConfig {
    /// Converts into the prefetcher configuration.
    #[must_use]
    pub fn to_prefetcher_config(&self) -> PrefetcherConfig {
        PrefetcherConfig {
            fetched_set_size: self.fetched_set_size,
            disk_cache_size: self.max_disk_bytes,
            max_concurrent_downloads: self.max_concurrent_downloads,
            timeout_secs: self.timeout_secs,
        }
    }

    /// Returns the effective cache directory.
    #[must_use]
    pub fn effective_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(crate::infrastructure::image::disk_cache::default_cache_dir)
    }
}

fn default_items_table() -> String {
    DEFAULT_ITEMS_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_batch_pause_ms() -> u64 {
    100
}

fn default_thumbnail_width() -> u32 {
    DEFAULT_THUMBNAIL_WIDTH
}

fn default_large_width() -> u32 {
    DEFAULT_LARGE_WIDTH
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_max_disk_bytes() -> u64 {
    DEFAULT_MAX_CACHE_SIZE
}

fn default_fetched_set_size() -> usize {
    DEFAULT_FETCHED_CAPACITY
}

fn default_max_concurrent_downloads() -> usize {
    4
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(url) = &args.backend_url {
            self.backend.url.clone_from(url);
        }
        if let Some(key) = &args.anon_key {
            self.backend.anon_key.clone_from(key);
        }
        if let Some(dir) = &args.cache_dir {
            self.image_cache.dir = Some(dir.clone());
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("shelfwarm.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}
