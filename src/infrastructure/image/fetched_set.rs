//! Bounded record of URLs already prefetched.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::domain::entities::ImageKey;

/// Default number of URLs remembered.
pub const DEFAULT_FETCHED_CAPACITY: usize = 512;

/// LRU set of prefetched image keys.
/// Thread-safe; lookups never await.
pub struct FetchedSet {
    keys: Mutex<LruCache<ImageKey, ()>>,
}

impl FetchedSet {
    /// Creates a set remembering at most `capacity` keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            keys: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Returns true if `key` was recorded, promoting it.
    pub fn contains(&self, key: &ImageKey) -> bool {
        let found = self.keys.lock().get(key).is_some();
        if found {
            trace!(key = %key, "Fetched set hit");
        }
        found
    }

    /// Records `key` as fetched.
    pub fn insert(&self, key: ImageKey) {
        self.keys.lock().put(key, ());
    }

    /// Forgets `key`, e.g. after its bytes were evicted from disk.
    pub fn remove(&self, key: &ImageKey) {
        self.keys.lock().pop(key);
    }

    /// Returns the number of remembered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    /// Returns true if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let set = FetchedSet::new(10);
        let key = ImageKey::new("a");

        assert!(!set.contains(&key));
        set.insert(key.clone());
        assert!(set.contains(&key));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_eviction_is_lru() {
        let set = FetchedSet::new(2);
        let (a, b, c) = (ImageKey::new("a"), ImageKey::new("b"), ImageKey::new("c"));

        set.insert(a.clone());
        set.insert(b.clone());
        assert!(set.contains(&a));
        set.insert(c.clone());

        assert!(set.contains(&a));
        assert!(!set.contains(&b));
        assert!(set.contains(&c));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let set = FetchedSet::new(0);
        set.insert(ImageKey::new("a"));
        set.insert(ImageKey::new("b"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let set = FetchedSet::new(DEFAULT_FETCHED_CAPACITY);
        set.insert(ImageKey::new("a"));
        set.remove(&ImageKey::new("a"));
        set.remove(&ImageKey::new("never-added"));
        assert!(set.is_empty());
    }
}
