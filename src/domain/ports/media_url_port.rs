//! Port definition for turning raw media references into display URLs.

/// Resolves storage references and derives resized variants.
#[cfg_attr(test, mockall::automock)]
pub trait MediaUrlPort: Send + Sync {
    /// Resolves a raw media reference against a storage bucket.
    fn resolve_storage_url(&self, raw_ref: &str, bucket: &str) -> String;

    /// Derives a variant of `url` rendered at `width` pixels and `quality`.
    fn derive_resolution_variant(&self, url: &str, width: u32, quality: u8) -> String;
}
