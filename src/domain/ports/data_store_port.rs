//! Data store port definition.

use async_trait::async_trait;

use crate::domain::entities::{Category, ContentItem};
use crate::domain::errors::StoreError;

/// Port for reading preloadable content from the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStorePort: Send + Sync {
    /// Lists up to `limit` available items of a category.
    ///
    /// The category is matched according to [`Category::filter`].
    async fn list_available_items_by_category(
        &self,
        category: Category,
        limit: usize,
    ) -> Result<Vec<ContentItem>, StoreError>;
}
