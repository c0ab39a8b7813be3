//! Hosted backend adapters.

/// REST data store client.
pub mod client;
/// Wire types.
pub mod dto;
/// Storage URL derivation.
pub mod storage_url;

pub use client::{DEFAULT_ITEMS_TABLE, RestDataStore, category_query};
pub use storage_url::{StorageUrlBuilder, derive_resolution_variant, resolve_storage_url};
