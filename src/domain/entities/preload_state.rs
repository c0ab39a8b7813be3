//! Per-category preload bookkeeping.

use super::Category;

/// Tracking record for one category.
///
/// `completed` and `in_progress` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadState {
    /// A full pass has finished.
    pub completed: bool,
    /// A pass is currently running.
    pub in_progress: bool,
    /// Derived URLs queued by the last pass.
    pub urls: Vec<String>,
}

impl PreloadState {
    /// Returns true if a new pass may start.
    #[must_use]
    pub const fn can_start(&self) -> bool {
        !self.completed && !self.in_progress
    }

    /// Appends a derived URL pair, skipping the large variant when it equals the thumbnail.
    pub fn push_variants(&mut self, thumbnail: String, large: String) {
        let duplicate = large == thumbnail;
        self.urls.push(thumbnail);
        if !duplicate {
            self.urls.push(large);
        }
    }
}

/// Read-only view of a category's preload state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadStatus {
    /// The category.
    pub category: Category,
    /// A full pass has finished.
    pub completed: bool,
    /// A pass is currently running.
    pub in_progress: bool,
    /// Number of derived URLs.
    pub url_count: usize,
}

impl PreloadStatus {
    /// Builds a status snapshot from a tracking record.
    #[must_use]
    pub fn from_state(category: Category, state: Option<&PreloadState>) -> Self {
        state.map_or(
            Self {
                category,
                completed: false,
                in_progress: false,
                url_count: 0,
            },
            |s| Self {
                category,
                completed: s.completed,
                in_progress: s.in_progress,
                url_count: s.urls.len(),
            },
        )
    }
}

impl std::fmt::Display for PreloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.completed {
            "ready"
        } else if self.in_progress {
            "loading"
        } else {
            "cold"
        };
        write!(f, "{:<14} {:<8} {} urls", self.category.label(), state, self.url_count)
    }
}

/// Result of a single preload pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// Nothing ran: unknown category, already completed or already running.
    Skipped,
    /// The data store failed; nothing was prefetched.
    StoreFailed,
    /// The data store returned no items.
    Empty,
    /// All batches ran.
    Completed {
        /// URLs prefetched successfully.
        fetched: usize,
        /// URLs whose prefetch failed.
        failed: usize,
        /// URLs skipped because the prefetcher already had them.
        cached: usize,
    },
}

impl PreloadOutcome {
    /// Returns true if the pass marked its category completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Aggregate result of preloading every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    /// Passes that completed.
    pub succeeded: usize,
    /// Passes that ended without completing (store failure, empty, panicked task).
    pub failed: usize,
    /// Passes skipped because the category was already warm or warming.
    pub skipped: usize,
}

impl PreloadSummary {
    /// Folds one pass outcome into the summary.
    pub fn record(&mut self, outcome: PreloadOutcome) {
        match outcome {
            PreloadOutcome::Completed { .. } => self.succeeded += 1,
            PreloadOutcome::Skipped => self.skipped += 1,
            PreloadOutcome::StoreFailed | PreloadOutcome::Empty => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_variants_dedups_equal_urls() {
        let mut state = PreloadState::default();
        state.push_variants("a".to_string(), "a".to_string());
        state.push_variants("b?w=1".to_string(), "b?w=2".to_string());
        assert_eq!(state.urls, vec!["a", "b?w=1", "b?w=2"]);
    }

    #[test]
    fn test_can_start() {
        let mut state = PreloadState::default();
        assert!(state.can_start());
        state.in_progress = true;
        assert!(!state.can_start());
        state.in_progress = false;
        state.completed = true;
        assert!(!state.can_start());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = PreloadSummary::default();
        summary.record(PreloadOutcome::Completed {
            fetched: 3,
            failed: 1,
            cached: 0,
        });
        summary.record(PreloadOutcome::Empty);
        summary.record(PreloadOutcome::StoreFailed);
        summary.record(PreloadOutcome::Skipped);
        assert_eq!(
            summary,
            PreloadSummary {
                succeeded: 1,
                failed: 2,
                skipped: 1
            }
        );
    }
}
