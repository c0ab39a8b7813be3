//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Category, ContentItem, PreloadOutcome, PreloadStatus, PreloadSummary};
pub use errors::{PrefetchError, StoreError};
pub use ports::{DataStorePort, ImagePrefetchPort, MediaUrlPort};
