//! Category-based image preloading.
//!
//! Warms the image cache one category at a time: read a capped set of items
//! from the data store, derive a thumbnail and a large variant of each cover
//! image, then prefetch them in small concurrent batches.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::domain::entities::{
    Category, ContentItem, PreloadOutcome, PreloadState, PreloadStatus, PreloadSummary,
};
use crate::domain::errors::PrefetchError;
use crate::domain::ports::{DataStorePort, ImagePrefetchPort, MediaUrlPort};

/// Maximum items read per category.
pub const DEFAULT_MAX_ITEMS: usize = 30;
/// URLs prefetched concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;
/// Pause between batches in background mode.
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(100);
/// Width of the thumbnail variant.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;
/// Width of the large variant.
pub const DEFAULT_LARGE_WIDTH: u32 = 1080;
/// Quality of both variants.
pub const DEFAULT_QUALITY: u8 = 80;

const LOG_URL_LEN: usize = 60;

/// Tuning for preload passes.
#[derive(Debug, Clone)]
pub struct PreloadConfig {
    /// Maximum items read per category.
    pub max_items: usize,
    /// URLs prefetched concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches in background mode.
    pub batch_pause: Duration,
    /// Width of the thumbnail variant.
    pub thumbnail_width: u32,
    /// Width of the large variant.
    pub large_width: u32,
    /// Quality of both variants.
    pub quality: u8,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause: DEFAULT_BATCH_PAUSE,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            large_width: DEFAULT_LARGE_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Per-category image preloader.
///
/// Cloning is cheap; clones share the same tracking state. At most one pass
/// runs per category, and a completed category is never preloaded again
/// until [`CategoryImageCache::clear`] is called.
#[derive(Clone)]
pub struct CategoryImageCache {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn DataStorePort>,
    prefetcher: Arc<dyn ImagePrefetchPort>,
    media_urls: Arc<dyn MediaUrlPort>,
    config: PreloadConfig,
    states: Mutex<HashMap<Category, PreloadState>>,
}

impl std::fmt::Debug for CategoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryImageCache")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Clears `in_progress` when a pass ends, however it ends.
struct PassGuard<'a> {
    inner: &'a Inner,
    category: Category,
}

impl PassGuard<'_> {
    fn complete(self) {
        let mut states = self.inner.states.lock();
        let state = states.entry(self.category).or_default();
        state.in_progress = false;
        state.completed = true;
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.inner.states.lock().get_mut(&self.category) {
            state.in_progress = false;
        }
    }
}

impl CategoryImageCache {
    /// Creates a cache with the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn DataStorePort>,
        prefetcher: Arc<dyn ImagePrefetchPort>,
        media_urls: Arc<dyn MediaUrlPort>,
        config: PreloadConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                prefetcher,
                media_urls,
                config,
                states: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &PreloadConfig {
        &self.inner.config
    }

    /// Spawns a foreground pass for every category and returns immediately.
    ///
    /// The handle resolves once every pass has settled; dropping it leaves
    /// the passes running.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn initialize_all(&self) -> JoinHandle<PreloadSummary> {
        let cache = self.clone();
        tokio::spawn(async move {
            let handles: Vec<_> = Category::ALL
                .into_iter()
                .map(|category| cache.spawn_preload(category, false))
                .collect();

            let mut summary = PreloadSummary::default();
            for result in join_all(handles).await {
                match result {
                    Ok(outcome) => summary.record(outcome),
                    Err(e) => {
                        error!(error = %e, "Preload task failed");
                        summary.failed += 1;
                    }
                }
            }

            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                skipped = summary.skipped,
                "Category preload finished"
            );
            summary
        })
    }

    /// Runs a preload pass in a detached task.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_preload(
        &self,
        category: Category,
        background: bool,
    ) -> JoinHandle<PreloadOutcome> {
        let cache = self.clone();
        tokio::spawn(async move { cache.preload_category(category, background).await })
    }

    /// Preloads a category given its label. Unknown labels are ignored.
    pub async fn preload_label(&self, label: &str, background: bool) -> PreloadOutcome {
        match Category::from_label(label) {
            Some(category) => self.preload_category(category, background).await,
            None => PreloadOutcome::Skipped,
        }
    }

    /// Runs one preload pass for `category`.
    ///
    /// Returns [`PreloadOutcome::Skipped`] without touching the data store
    /// if the category is already completed or another pass is running.
    /// In `background` mode batches are separated by the configured pause.
    pub async fn preload_category(&self, category: Category, background: bool) -> PreloadOutcome {
        let Some(guard) = self.begin(category) else {
            trace!(category = %category, "Preload already done or running");
            return PreloadOutcome::Skipped;
        };

        let config = &self.inner.config;
        debug!(category = %category, background, "Starting category preload");

        let items = match self
            .inner
            .store
            .list_available_items_by_category(category, config.max_items)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(category = %category, error = %e, "Failed to list items for preload");
                return PreloadOutcome::StoreFailed;
            }
        };

        if items.is_empty() {
            debug!(category = %category, "No items to preload");
            return PreloadOutcome::Empty;
        }

        let urls = self.derive_urls(category, &items);
        self.inner
            .states
            .lock()
            .entry(category)
            .or_default()
            .urls
            .extend(urls.iter().cloned());

        let (fetched, failed, cached) = self.prefetch_in_batches(&urls, background).await;

        guard.complete();
        info!(
            category = %category,
            items = items.len().min(config.max_items),
            fetched,
            failed,
            cached,
            "Category preload complete"
        );

        PreloadOutcome::Completed {
            fetched,
            failed,
            cached,
        }
    }

    /// Spawns background passes for the categories before and after
    /// `category` in browse order.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn preload_adjacent(&self, category: Category) -> Vec<JoinHandle<PreloadOutcome>> {
        category
            .neighbours()
            .into_iter()
            .map(|neighbour| self.spawn_preload(neighbour, true))
            .collect()
    }

    /// Label form of [`CategoryImageCache::preload_adjacent`]. Unknown labels are ignored.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn preload_adjacent_label(&self, label: &str) -> Vec<JoinHandle<PreloadOutcome>> {
        Category::from_label(label)
            .map(|category| self.preload_adjacent(category))
            .unwrap_or_default()
    }

    /// Returns true once a pass for `category` has completed.
    #[must_use]
    pub fn is_preloaded(&self, category: Category) -> bool {
        self.inner
            .states
            .lock()
            .get(&category)
            .is_some_and(|s| s.completed)
    }

    /// Label form of [`CategoryImageCache::is_preloaded`]. False for unknown labels.
    #[must_use]
    pub fn is_label_preloaded(&self, label: &str) -> bool {
        Category::from_label(label).is_some_and(|c| self.is_preloaded(c))
    }

    /// Returns a snapshot of one category's state.
    #[must_use]
    pub fn status(&self, category: Category) -> PreloadStatus {
        PreloadStatus::from_state(category, self.inner.states.lock().get(&category))
    }

    /// Returns snapshots for every category in browse order.
    #[must_use]
    pub fn statuses(&self) -> Vec<PreloadStatus> {
        let states = self.inner.states.lock();
        Category::ALL
            .into_iter()
            .map(|c| PreloadStatus::from_state(c, states.get(&c)))
            .collect()
    }

    /// Returns the URLs derived for `category`.
    #[must_use]
    pub fn urls(&self, category: Category) -> Vec<String> {
        self.inner
            .states
            .lock()
            .get(&category)
            .map(|s| s.urls.clone())
            .unwrap_or_default()
    }

    /// Forgets completion and derived URLs for every category.
    ///
    /// Passes already running are not stopped and will still mark their
    /// category completed when they finish.
    pub fn clear(&self) {
        let mut states = self.inner.states.lock();
        for state in states.values_mut() {
            state.completed = false;
            state.urls.clear();
        }
        debug!("Cleared category preload state");
    }

    fn begin(&self, category: Category) -> Option<PassGuard<'_>> {
        let mut states = self.inner.states.lock();
        let state = states.entry(category).or_default();
        if !state.can_start() {
            return None;
        }
        state.in_progress = true;
        Some(PassGuard {
            inner: &self.inner,
            category,
        })
    }

    fn derive_urls(&self, category: Category, items: &[ContentItem]) -> Vec<String> {
        let config = &self.inner.config;
        let media_urls = &self.inner.media_urls;
        let mut derived = PreloadState::default();

        for item in items.iter().take(config.max_items) {
            let Some(cover) = item.cover() else {
                trace!(category = %category, id = %item.id, "Item has no media");
                continue;
            };

            let url = media_urls.resolve_storage_url(cover, category.bucket());
            let thumbnail =
                media_urls.derive_resolution_variant(&url, config.thumbnail_width, config.quality);
            let large =
                media_urls.derive_resolution_variant(&url, config.large_width, config.quality);
            derived.push_variants(thumbnail, large);
        }

        derived.urls
    }

    async fn prefetch_in_batches(
        &self,
        urls: &[String],
        background: bool,
    ) -> (usize, usize, usize) {
        let prefetcher = &self.inner.prefetcher;
        let (pending, warm): (Vec<&String>, Vec<&String>) =
            urls.iter().partition(|url| !prefetcher.has_fetched(url));

        let batch_size = self.inner.config.batch_size.max(1);
        let batch_count = pending.len().div_ceil(batch_size);
        let mut fetched = 0;
        let mut failed = 0;

        for (index, batch) in pending.chunks(batch_size).enumerate() {
            let results = join_all(batch.iter().map(|url| self.prefetch_one(url))).await;
            for ok in results {
                if ok {
                    fetched += 1;
                } else {
                    failed += 1;
                }
            }

            if background && index + 1 < batch_count {
                tokio::time::sleep(self.inner.config.batch_pause).await;
            }
        }

        (fetched, failed, warm.len())
    }

    async fn prefetch_one(&self, url: &str) -> bool {
        match self.inner.prefetcher.prefetch(url).await {
            Ok(()) => true,
            Err(e) => {
                log_prefetch_failure(url, &e);
                false
            }
        }
    }
}

fn log_prefetch_failure(url: &str, error: &PrefetchError) {
    debug!(url = %truncate_url(url), error = %error, "Image prefetch failed");
}

fn truncate_url(url: &str) -> &str {
    url.char_indices()
        .nth(LOG_URL_LEN)
        .map_or(url, |(i, _)| &url[..i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{FakeDataStore, FakeMediaUrls, RecordingPrefetcher};
    use crate::domain::ports::{MockDataStorePort, MockImagePrefetchPort, MockMediaUrlPort};
    use tokio::sync::Notify;

    fn make_cache(
        store: Arc<dyn DataStorePort>,
        prefetcher: Arc<dyn ImagePrefetchPort>,
    ) -> CategoryImageCache {
        CategoryImageCache::new(
            store,
            prefetcher,
            Arc::new(FakeMediaUrls),
            PreloadConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_second_call_after_completion_is_noop() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Beauty, 3);
        let prefetcher = Arc::new(RecordingPrefetcher::new());
        let cache = make_cache(store.clone(), prefetcher.clone());

        let first = cache.preload_category(Category::Beauty, false).await;
        let second = cache.preload_category(Category::Beauty, false).await;

        assert_eq!(
            first,
            PreloadOutcome::Completed {
                fetched: 6,
                failed: 0,
                cached: 0
            }
        );
        assert_eq!(second, PreloadOutcome::Skipped);
        assert_eq!(store.calls_for(Category::Beauty), 1);
        assert_eq!(prefetcher.urls().len(), 6);
        assert!(cache.is_preloaded(Category::Beauty));
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_pass() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(FakeDataStore::gated(gate.clone()));
        store.seed(Category::Fitness, 2);
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        let (first, second, ()) = tokio::join!(
            cache.preload_category(Category::Fitness, false),
            async {
                assert_eq!(store.in_flight(), 1);
                assert!(cache.status(Category::Fitness).in_progress);
                cache.preload_category(Category::Fitness, false).await
            },
            async { gate.notify_one() },
        );

        assert!(first.is_completed());
        assert_eq!(second, PreloadOutcome::Skipped);
        assert_eq!(store.calls_for(Category::Fitness), 1);
        assert_eq!(store.in_flight(), 0);

        let status = cache.status(Category::Fitness);
        assert!(status.completed);
        assert!(!status.in_progress);
    }

    #[tokio::test]
    async fn test_prefetch_failures_do_not_abort_pass() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Events, 4);
        let prefetcher = Arc::new(RecordingPrefetcher::failing());
        let cache = make_cache(store, prefetcher.clone());

        let outcome = cache.preload_category(Category::Events, false).await;

        assert_eq!(
            outcome,
            PreloadOutcome::Completed {
                fetched: 0,
                failed: 8,
                cached: 0
            }
        );
        assert_eq!(prefetcher.urls().len(), 8);
        assert!(cache.is_preloaded(Category::Events));
    }

    #[tokio::test]
    async fn test_store_read_is_capped() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Photography, 50);
        let prefetcher = Arc::new(RecordingPrefetcher::new());
        let cache = make_cache(store.clone(), prefetcher.clone());

        cache.preload_category(Category::Photography, false).await;

        assert_eq!(store.calls(), vec![(Category::Photography, DEFAULT_MAX_ITEMS)]);
        assert_eq!(cache.urls(Category::Photography).len(), DEFAULT_MAX_ITEMS * 2);
        assert_eq!(prefetcher.urls().len(), DEFAULT_MAX_ITEMS * 2);
    }

    #[tokio::test]
    async fn test_cap_applies_to_oversized_store_results() {
        let mut store = MockDataStorePort::new();
        store
            .expect_list_available_items_by_category()
            .times(1)
            .returning(|_, _| {
                Ok((0..50)
                    .map(|i| ContentItem::new(i.to_string(), vec![format!("{i}.jpg")]))
                    .collect())
            });
        let cache = make_cache(Arc::new(store), Arc::new(RecordingPrefetcher::new()));

        cache.preload_category(Category::Tutoring, false).await;

        assert_eq!(cache.urls(Category::Tutoring).len(), DEFAULT_MAX_ITEMS * 2);
    }

    #[tokio::test]
    async fn test_identical_variants_are_stored_once() {
        let store = Arc::new(FakeDataStore::new());
        store.set_items(
            Category::HomeServices,
            vec![
                ContentItem::new("1", vec!["external/a.jpg".to_string()]),
                ContentItem::new("2", vec!["b.jpg".to_string(), "ignored.jpg".to_string()]),
                ContentItem::new("3", Vec::new()),
            ],
        );
        let cache = make_cache(store, Arc::new(RecordingPrefetcher::new()));

        cache.preload_category(Category::HomeServices, false).await;

        assert_eq!(
            cache.urls(Category::HomeServices),
            vec![
                "https://store.test/post-media/external/a.jpg".to_string(),
                "https://store.test/post-media/b.jpg?width=400&quality=80".to_string(),
                "https://store.test/post-media/b.jpg?width=1080&quality=80".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_marketplace_uses_its_own_bucket() {
        let store = Arc::new(FakeDataStore::new());
        store.set_items(
            Category::Marketplace,
            vec![ContentItem::new("9", vec!["external/sofa.jpg".to_string()])],
        );
        let cache = make_cache(store, Arc::new(RecordingPrefetcher::new()));

        cache.preload_category(Category::Marketplace, false).await;

        assert_eq!(
            cache.urls(Category::Marketplace),
            vec!["https://store.test/marketplace-images/external/sofa.jpg".to_string()]
        );
    }

    #[tokio::test]
    async fn test_variants_use_configured_widths() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Marketplace, 1);
        let mut media_urls = MockMediaUrlPort::new();
        media_urls
            .expect_resolve_storage_url()
            .withf(|raw, bucket| {
                raw.to_string() == "marketplace/0.jpg" && bucket.to_string() == "marketplace-images"
            })
            .times(1)
            .returning(|raw, bucket| format!("{bucket}/{raw}"));
        media_urls
            .expect_derive_resolution_variant()
            .withf(|_, width, quality| {
                (*width == DEFAULT_THUMBNAIL_WIDTH || *width == DEFAULT_LARGE_WIDTH)
                    && *quality == DEFAULT_QUALITY
            })
            .times(2)
            .returning(|url, width, _| format!("{url}@{width}"));
        let cache = CategoryImageCache::new(
            store,
            Arc::new(RecordingPrefetcher::new()),
            Arc::new(media_urls),
            PreloadConfig::default(),
        );

        cache.preload_category(Category::Marketplace, false).await;

        assert_eq!(
            cache.urls(Category::Marketplace),
            vec![
                "marketplace-images/marketplace/0.jpg@400".to_string(),
                "marketplace-images/marketplace/0.jpg@1080".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_adjacent_at_first_category() {
        let store = Arc::new(FakeDataStore::new());
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        for handle in cache.preload_adjacent(Category::ALL[0]) {
            handle.await.unwrap();
        }

        let called: Vec<_> = store.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(called, vec![Category::ALL[1]]);
    }

    #[tokio::test]
    async fn test_adjacent_at_last_category() {
        let store = Arc::new(FakeDataStore::new());
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        for handle in cache.preload_adjacent(Category::Marketplace) {
            handle.await.unwrap();
        }

        let called: Vec<_> = store.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(called, vec![Category::Events]);
    }

    #[tokio::test]
    async fn test_adjacent_in_middle_warms_both_sides() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Fitness, 1);
        store.seed(Category::Tutoring, 1);
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        for handle in cache.preload_adjacent_label("Photography") {
            assert!(handle.await.unwrap().is_completed());
        }

        assert!(cache.is_preloaded(Category::Fitness));
        assert!(cache.is_preloaded(Category::Tutoring));
        assert!(!cache.is_preloaded(Category::Photography));
    }

    #[tokio::test]
    async fn test_clear_resets_visibility() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Beauty, 2);
        store.seed(Category::Marketplace, 2);
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        cache.preload_category(Category::Beauty, false).await;
        cache.preload_category(Category::Marketplace, false).await;
        assert!(cache.is_preloaded(Category::Beauty));

        cache.clear();

        assert!(!cache.is_preloaded(Category::Beauty));
        assert!(!cache.is_preloaded(Category::Marketplace));
        assert!(cache.urls(Category::Beauty).is_empty());
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_pass_running_across_clear_still_completes() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(FakeDataStore::gated(gate.clone()));
        store.seed(Category::Events, 1);
        let cache = make_cache(store, Arc::new(RecordingPrefetcher::new()));

        let (outcome, ()) = tokio::join!(cache.preload_category(Category::Events, false), async {
            cache.clear();
            gate.notify_one();
        });

        assert!(outcome.is_completed());
        assert!(cache.is_preloaded(Category::Events));
    }

    #[tokio::test]
    async fn test_unknown_label_is_ignored() {
        let mut store = MockDataStorePort::new();
        store.expect_list_available_items_by_category().never();
        let mut prefetcher = MockImagePrefetchPort::new();
        prefetcher.expect_prefetch().never();
        prefetcher.expect_has_fetched().never();
        let cache = make_cache(Arc::new(store), Arc::new(prefetcher));

        let outcome = cache.preload_label("NotARealCategory", false).await;

        assert_eq!(outcome, PreloadOutcome::Skipped);
        assert!(!cache.is_label_preloaded("NotARealCategory"));
        assert!(cache.preload_adjacent_label("NotARealCategory").is_empty());
        assert!(cache.statuses().iter().all(|s| s.url_count == 0 && !s.in_progress));
    }

    #[tokio::test]
    async fn test_store_failure_allows_retry() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Tutoring, 2);
        store.set_should_fail(true);
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        let outcome = cache.preload_category(Category::Tutoring, false).await;
        assert_eq!(outcome, PreloadOutcome::StoreFailed);
        let status = cache.status(Category::Tutoring);
        assert!(!status.in_progress);
        assert!(!status.completed);

        store.set_should_fail(false);
        let retry = cache.preload_category(Category::Tutoring, false).await;
        assert!(retry.is_completed());
        assert_eq!(store.calls_for(Category::Tutoring), 2);
    }

    #[tokio::test]
    async fn test_empty_result_clears_in_progress() {
        let store = Arc::new(FakeDataStore::new());
        let prefetcher = Arc::new(RecordingPrefetcher::new());
        let cache = make_cache(store, prefetcher.clone());

        let outcome = cache.preload_category(Category::Beauty, true).await;

        assert_eq!(outcome, PreloadOutcome::Empty);
        assert!(!cache.status(Category::Beauty).in_progress);
        assert!(!cache.is_preloaded(Category::Beauty));
        assert!(prefetcher.urls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_pauses_between_batches_only() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Photography, 6);
        let prefetcher = Arc::new(RecordingPrefetcher::with_delay(Duration::from_millis(10)));
        let cache = make_cache(store, prefetcher.clone());

        let start = tokio::time::Instant::now();
        cache.preload_category(Category::Photography, true).await;
        let elapsed = start.elapsed();

        let times = prefetcher.call_times();
        assert_eq!(times.len(), 12);
        assert_eq!(prefetcher.max_concurrent(), DEFAULT_BATCH_SIZE);
        assert_eq!(times[4], times[0]);
        assert!(times[5] - times[0] >= Duration::from_millis(110));
        assert!(times[10] - times[5] >= Duration::from_millis(110));
        // Two pauses, none after the final batch.
        assert!(elapsed >= Duration::from_millis(230));
        assert!(elapsed < Duration::from_millis(330));
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreground_has_no_pauses() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Photography, 6);
        let prefetcher = Arc::new(RecordingPrefetcher::with_delay(Duration::from_millis(10)));
        let cache = make_cache(store, prefetcher);

        let start = tokio::time::Instant::now();
        cache.preload_category(Category::Photography, false).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < DEFAULT_BATCH_PAUSE);
    }

    #[tokio::test]
    async fn test_already_fetched_urls_are_skipped() {
        let store = Arc::new(FakeDataStore::new());
        store.seed(Category::Beauty, 3);
        let prefetcher = Arc::new(RecordingPrefetcher::new());
        let cache = make_cache(store, prefetcher.clone());

        cache.preload_category(Category::Beauty, false).await;
        cache.clear();
        let outcome = cache.preload_category(Category::Beauty, false).await;

        assert_eq!(
            outcome,
            PreloadOutcome::Completed {
                fetched: 0,
                failed: 0,
                cached: 6
            }
        );
        assert_eq!(prefetcher.urls().len(), 6);
    }

    #[tokio::test]
    async fn test_initialize_all_reports_summary() {
        let store = Arc::new(FakeDataStore::new());
        for category in Category::ALL {
            if category != Category::Events {
                store.seed(category, 2);
            }
        }
        let cache = make_cache(store.clone(), Arc::new(RecordingPrefetcher::new()));

        let summary = cache.initialize_all().await.unwrap();

        assert_eq!(
            summary,
            PreloadSummary {
                succeeded: 6,
                failed: 1,
                skipped: 0
            }
        );
        assert_eq!(store.calls().len(), Category::ALL.len());
        assert!(!cache.is_preloaded(Category::Events));
        assert!(cache.is_label_preloaded("Marketplace"));
    }

    #[test]
    fn test_truncate_url() {
        let long = "x".repeat(100);
        assert_eq!(truncate_url(&long).len(), LOG_URL_LEN);
        assert_eq!(truncate_url("short"), "short");
    }
}
