//! On-disk store for prefetched image bytes.
//!
//! Each image lives in one `<key>.img` file. Writes go to a `.part` file in
//! the same directory and are renamed into place, so an `.img` file is never
//! observed half-written.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use tokio::fs;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageKey;
use crate::domain::errors::PrefetchError;

/// Maximum disk cache size in bytes (200 MB default).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 200 * 1024 * 1024;

const IMAGE_EXT: &str = "img";
const PART_EXT: &str = "part";

#[derive(Debug, Default, Clone, Copy)]
struct Usage {
    bytes: u64,
    files: usize,
}

struct CachedFile {
    path: PathBuf,
    accessed: SystemTime,
    len: u64,
}

/// Size-bounded directory of cached image payloads.
pub struct DiskImageCache {
    dir: PathBuf,
    max_bytes: u64,
    usage: Mutex<Usage>,
}

impl std::fmt::Debug for DiskImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskImageCache")
            .field("dir", &self.dir)
            .field("max_bytes", &self.max_bytes)
            .field("usage", &*self.usage.lock())
            .finish()
    }
}

impl DiskImageCache {
    /// Opens (creating if needed) the cache rooted at `dir`.
    ///
    /// Leftover `.part` files from interrupted writes are removed and the
    /// cache is trimmed to `max_bytes`.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or listed.
    pub async fn new(dir: PathBuf, max_bytes: u64) -> Result<Self, PrefetchError> {
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| PrefetchError::Io(format!("Failed to create cache dir: {e}")))?;

        let cache = Self {
            dir,
            max_bytes,
            usage: Mutex::new(Usage::default()),
        };

        for stale in cache.list(PART_EXT).await? {
            if let Err(e) = fs::remove_file(&stale.path).await {
                warn!(
                    path = %stale.path.display(),
                    error = %e,
                    "Failed to remove partial write"
                );
            }
        }

        let files = cache.list(IMAGE_EXT).await?;
        *cache.usage.lock() = Usage {
            bytes: files.iter().map(|f| f.len).sum(),
            files: files.len(),
        };
        debug!(dir = %cache.dir.display(), files = files.len(), "Opened disk cache");

        cache.trim().await;
        Ok(cache)
    }

    fn path_for(&self, key: &ImageKey) -> PathBuf {
        self.dir.join(format!("{}.{IMAGE_EXT}", key.as_str()))
    }

    async fn list(&self, ext: &str) -> Result<Vec<CachedFile>, PrefetchError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| PrefetchError::Io(format!("Failed to read cache dir: {e}")))?;

        let mut files = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != ext) {
                continue;
            }
            if let Ok(meta) = entry.metadata().await {
                files.push(CachedFile {
                    path,
                    accessed: meta.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
                    len: meta.len(),
                });
            }
        }
        Ok(files)
    }

    /// Reads a cached payload. Missing and empty files are both a miss.
    pub async fn read(&self, key: &ImageKey) -> Option<Vec<u8>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) if !bytes.is_empty() => {
                trace!(key = %key, size = bytes.len(), "Disk cache hit");
                Some(bytes)
            }
            _ => None,
        }
    }

    /// Writes `bytes` under `key`, replacing any previous payload.
    ///
    /// Returns the keys evicted to stay under the size limit.
    ///
    /// # Errors
    /// Returns error if the payload cannot be written. No `.img` file is
    /// created or modified in that case.
    pub async fn store(
        &self,
        key: &ImageKey,
        bytes: &[u8],
    ) -> Result<Vec<ImageKey>, PrefetchError> {
        let path = self.path_for(key);
        let previous = fs::metadata(&path).await.map(|m| m.len()).ok();

        let dir = self.dir.clone();
        let target = path.clone();
        let payload = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &payload))
            .await
            .map_err(|e| PrefetchError::Io(format!("Cache write task failed: {e}")))?
            .map_err(|e| PrefetchError::Io(format!("Failed to write cache file: {e}")))?;

        {
            let mut usage = self.usage.lock();
            usage.bytes = usage.bytes.saturating_sub(previous.unwrap_or(0)) + bytes.len() as u64;
            if previous.is_none() {
                usage.files += 1;
            }
        }
        debug!(key = %key, size = bytes.len(), "Stored image on disk");

        Ok(self.trim().await)
    }

    /// Deletes the payload for `key`, if any.
    pub async fn remove(&self, key: &ImageKey) {
        let path = self.path_for(key);
        let Ok(meta) = fs::metadata(&path).await else {
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                let mut usage = self.usage.lock();
                usage.bytes = usage.bytes.saturating_sub(meta.len());
                usage.files = usage.files.saturating_sub(1);
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to remove cached image"),
        }
    }

    /// Bytes currently on disk.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.usage.lock().bytes
    }

    /// Number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.usage.lock().files
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops least recently accessed files until 90% of the limit is free.
    async fn trim(&self) -> Vec<ImageKey> {
        let size = self.size_bytes();
        if size <= self.max_bytes {
            return Vec::new();
        }
        debug!(size, max = self.max_bytes, "Disk cache over limit");

        let Ok(mut files) = self.list(IMAGE_EXT).await else {
            return Vec::new();
        };
        files.sort_by_key(|f| f.accessed);

        let goal = size - self.max_bytes + self.max_bytes / 10;
        let mut freed = 0u64;
        let mut evicted = Vec::new();
        for file in files {
            if freed >= goal {
                break;
            }
            if let Err(e) = fs::remove_file(&file.path).await {
                warn!(path = %file.path.display(), error = %e, "Failed to evict cached image");
                continue;
            }
            freed += file.len;
            if let Some(stem) = file.path.file_stem().and_then(|s| s.to_str()) {
                evicted.push(ImageKey::new(stem));
            }
        }

        {
            let mut usage = self.usage.lock();
            usage.bytes = usage.bytes.saturating_sub(freed);
            usage.files = usage.files.saturating_sub(evicted.len());
        }
        debug!(freed, count = evicted.len(), "Disk cache trimmed");
        evicted
    }
}

fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut part = tempfile::Builder::new()
        .suffix(&format!(".{PART_EXT}"))
        .tempfile_in(dir)?;
    part.write_all(bytes)?;
    part.as_file().sync_all()?;
    part.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Returns the default cache directory path.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "linuxmobile", "shelfwarm").map_or_else(
        || {
            std::env::temp_dir()
                .join("shelfwarm")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}
