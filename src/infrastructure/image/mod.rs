//! Image prefetch infrastructure.
//!
//! This module provides:
//! - An HTTP prefetcher implementing the prefetch port
//! - Disk caching of downloaded bytes
//! - An LRU record of already-fetched URLs

pub mod disk_cache;
pub mod fetched_set;
pub mod prefetcher;

pub use disk_cache::DiskImageCache;
pub use fetched_set::FetchedSet;
pub use prefetcher::{HttpImagePrefetcher, PrefetcherConfig, check_image_payload};
