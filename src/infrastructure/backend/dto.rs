//! Row and error payloads returned by the REST backend.

use serde::Deserialize;

use crate::domain::entities::ContentItem;
use crate::domain::serde_utils;

/// Row shape returned by the items table.
#[derive(Debug, Deserialize)]
pub struct ItemRow {
    /// Row identifier (UUID or integer key).
    #[serde(with = "serde_utils::string_or_number")]
    pub id: String,
    /// Media references; `null` when the row has none.
    #[serde(default, deserialize_with = "serde_utils::null_as_empty")]
    pub media_urls: Vec<String>,
}

impl From<ItemRow> for ContentItem {
    fn from(row: ItemRow) -> Self {
        Self::new(row.id, row.media_urls)
    }
}

/// Error body returned by the REST layer.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    pub message: String,
}
