//! Items returned by the data store.

/// A row eligible for preloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Backend row identifier.
    pub id: String,
    /// Raw media references, in display order.
    pub media_refs: Vec<String>,
}

impl ContentItem {
    /// Creates a new item.
    #[must_use]
    pub fn new(id: impl Into<String>, media_refs: Vec<String>) -> Self {
        Self {
            id: id.into(),
            media_refs,
        }
    }

    /// The cover image reference. Only this one is preloaded.
    #[must_use]
    pub fn cover(&self) -> Option<&str> {
        self.media_refs
            .first()
            .map(String::as_str)
            .filter(|r| !r.trim().is_empty())
    }
}
