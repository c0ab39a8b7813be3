//! Domain entities.

mod category;
mod content_item;
mod image_key;
mod preload_state;

pub use category::{Category, CategoryFilter, MARKETPLACE_BUCKET, POST_MEDIA_BUCKET};
pub use content_item::ContentItem;
pub use image_key::ImageKey;
pub use preload_state::{PreloadOutcome, PreloadState, PreloadStatus, PreloadSummary};
