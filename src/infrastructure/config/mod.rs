//! Application configuration.

/// Configuration model.
pub mod app_config;
/// CLI arguments.
pub mod args;
/// Config file persistence.
pub mod store;

pub use app_config::{AppConfig, BackendConfig, ImageCacheConfig, LogLevel, PreloadSettings};
pub use args::CliArgs;
pub use store::{ConfigError, ConfigStore};
