//! Infrastructure layer with external service adapters.

/// Hosted backend (table API and object storage).
pub mod backend;
/// Application configuration.
pub mod config;
/// Image prefetching and local caching.
pub mod image;

pub use backend::{RestDataStore, StorageUrlBuilder};
pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use image::{DiskImageCache, HttpImagePrefetcher, PrefetcherConfig};
