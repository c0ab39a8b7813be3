//! Port definition for warming the platform image cache.

use async_trait::async_trait;

use crate::domain::errors::PrefetchError;

/// Port for prefetching images without rendering them.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImagePrefetchPort: Send + Sync {
    /// Downloads the image into the cache.
    async fn prefetch(&self, url: &str) -> Result<(), PrefetchError>;

    /// Returns true if the URL has already been prefetched.
    fn has_fetched(&self, url: &str) -> bool;
}
