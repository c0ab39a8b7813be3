//! Storage URL resolution and image-render variants.

use crate::domain::ports::MediaUrlPort;

const OBJECT_PATH: &str = "/storage/v1/object/public/";
const RENDER_PATH: &str = "/storage/v1/render/image/public/";

/// Builds public storage URLs for a backend project.
#[derive(Debug, Clone)]
pub struct StorageUrlBuilder {
    base_url: String,
}

impl StorageUrlBuilder {
    /// Creates a builder for the project at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl MediaUrlPort for StorageUrlBuilder {
    fn resolve_storage_url(&self, raw_ref: &str, bucket: &str) -> String {
        resolve_storage_url(&self.base_url, raw_ref, bucket)
    }

    fn derive_resolution_variant(&self, url: &str, width: u32, quality: u8) -> String {
        derive_resolution_variant(url, width, quality)
    }
}

/// Checks if a reference is already an absolute URL.
#[must_use]
pub fn is_absolute_url(raw_ref: &str) -> bool {
    raw_ref.starts_with("https://") || raw_ref.starts_with("http://")
}

/// Resolves a raw media reference to a public object URL.
///
/// Absolute URLs are returned unchanged.
#[must_use]
pub fn resolve_storage_url(base_url: &str, raw_ref: &str, bucket: &str) -> String {
    let raw_ref = raw_ref.trim();
    if is_absolute_url(raw_ref) {
        return raw_ref.to_string();
    }

    let path = raw_ref.trim_start_matches('/');
    let path = path
        .strip_prefix(bucket)
        .and_then(|p| p.strip_prefix('/'))
        .unwrap_or(path);

    format!("{}{OBJECT_PATH}{bucket}/{path}", base_url.trim_end_matches('/'))
}

/// Derives a resized variant of a public object URL.
///
/// Only URLs served from public object storage can be rendered at another
/// size; anything else is returned unchanged.
#[must_use]
pub fn derive_resolution_variant(url: &str, width: u32, quality: u8) -> String {
    let (base_url, existing_params) = match url.split_once('?') {
        Some((base, params)) => (base, Some(params)),
        None => (url, None),
    };

    let base_url = if let Some(idx) = base_url.find(OBJECT_PATH) {
        format!(
            "{}{RENDER_PATH}{}",
            &base_url[..idx],
            &base_url[idx + OBJECT_PATH.len()..]
        )
    } else if base_url.contains(RENDER_PATH) {
        base_url.to_string()
    } else {
        return url.to_string();
    };

    let mut params = vec![format!("width={width}"), format!("quality={quality}")];

    if let Some(existing) = existing_params {
        for param in existing.split('&').filter(|p| !p.is_empty()) {
            let key = param.split('=').next().unwrap_or("");
            if !["width", "height", "quality", "resize"].contains(&key) {
                params.push(param.to_string());
            }
        }
    }

    format!("{}?{}", base_url, params.join("&"))
}
