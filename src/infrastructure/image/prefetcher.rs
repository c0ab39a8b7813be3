//! HTTP image prefetcher.
//!
//! Downloads images ahead of display and keeps their bytes on disk:
//! fetched set -> disk cache -> network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Semaphore;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageKey;
use crate::domain::errors::PrefetchError;
use crate::domain::ports::ImagePrefetchPort;

use super::disk_cache::{DEFAULT_MAX_CACHE_SIZE, DiskImageCache};
use super::fetched_set::{DEFAULT_FETCHED_CAPACITY, FetchedSet};

/// Configuration for the prefetcher.
#[derive(Debug, Clone)]
pub struct PrefetcherConfig {
    /// Maximum URLs remembered as fetched.
    pub fetched_set_size: usize,
    /// Maximum disk cache size in bytes.
    pub disk_cache_size: u64,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PrefetcherConfig {
    fn default() -> Self {
        Self {
            fetched_set_size: DEFAULT_FETCHED_CAPACITY,
            disk_cache_size: DEFAULT_MAX_CACHE_SIZE,
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

/// Warms the local image cache over HTTP.
pub struct HttpImagePrefetcher {
    http_client: reqwest::Client,
    disk_cache: Arc<DiskImageCache>,
    fetched: FetchedSet,
    downloads: Semaphore,
    config: PrefetcherConfig,
}

impl std::fmt::Debug for HttpImagePrefetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImagePrefetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpImagePrefetcher {
    /// Creates a prefetcher writing into `disk_cache`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        config: PrefetcherConfig,
        disk_cache: Arc<DiskImageCache>,
    ) -> Result<Self, PrefetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PrefetchError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            disk_cache,
            fetched: FetchedSet::new(config.fetched_set_size),
            downloads: Semaphore::new(config.max_concurrent_downloads.max(1)),
            config,
        })
    }

    /// Returns true if `key` has a readable image on disk. Unreadable
    /// payloads are deleted so the next prefetch downloads them again.
    async fn on_disk(&self, key: &ImageKey) -> bool {
        let Some(bytes) = self.disk_cache.read(key).await else {
            return false;
        };
        if check_image_payload(&bytes).is_ok() {
            return true;
        }
        warn!(key = %key, size = bytes.len(), "Discarding unreadable cached image");
        self.disk_cache.remove(key).await;
        false
    }

    /// Writes a downloaded payload and records it as fetched. Keys the disk
    /// cache evicts to make room are forgotten too.
    async fn keep(&self, key: ImageKey, bytes: &[u8]) -> Result<(), PrefetchError> {
        for evicted in self.disk_cache.store(&key, bytes).await? {
            trace!(key = %evicted, "Forgetting evicted image");
            self.fetched.remove(&evicted);
        }
        self.fetched.insert(key);
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Bytes, PrefetchError> {
        let _permit = self
            .downloads
            .acquire()
            .await
            .map_err(|e| PrefetchError::Network(format!("Download slots closed: {e}")))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PrefetchError::Network(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PrefetchError::Http {
                status: response.status().as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| PrefetchError::Network(format!("Failed to read body: {e}")))
    }
}

/// Rejects payloads that are not a known image format.
///
/// # Errors
/// Returns [`PrefetchError::NotAnImage`] if the format cannot be guessed.
pub fn check_image_payload(bytes: &[u8]) -> Result<image::ImageFormat, PrefetchError> {
    image::guess_format(bytes).map_err(|_| PrefetchError::NotAnImage)
}

#[async_trait]
impl ImagePrefetchPort for HttpImagePrefetcher {
    async fn prefetch(&self, url: &str) -> Result<(), PrefetchError> {
        let key = ImageKey::from_url(url);

        if self.fetched.contains(&key) {
            return Ok(());
        }

        if self.on_disk(&key).await {
            trace!(key = %key, "Image already on disk");
            self.fetched.insert(key);
            return Ok(());
        }

        let bytes = self.download(url).await?;
        let format = check_image_payload(&bytes)?;
        self.keep(key, &bytes).await?;
        debug!(
            format = ?format,
            size = bytes.len(),
            remembered = self.fetched.len(),
            "Prefetched image"
        );
        Ok(())
    }

    fn has_fetched(&self, url: &str) -> bool {
        self.fetched.contains(&ImageKey::from_url(url))
    }
}
