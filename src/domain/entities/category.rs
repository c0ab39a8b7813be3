//! Content categories used to partition preloading work.

use serde::{Deserialize, Serialize};

/// Storage bucket holding marketplace listing media.
pub const MARKETPLACE_BUCKET: &str = "marketplace-images";

/// Storage bucket shared by all provider categories.
pub const POST_MEDIA_BUCKET: &str = "post-media";

/// A content category in browse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Hair, nails and makeup providers.
    Beauty,
    /// Trainers and coaches.
    Fitness,
    /// Photographers.
    Photography,
    /// Tutors and lessons.
    Tutoring,
    /// Cleaning, repairs and other home services.
    HomeServices,
    /// Event planners and venues.
    Events,
    /// Second-hand marketplace listings.
    Marketplace,
}

/// How the backend matches a category against the item's category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Column must equal the label.
    Exact,
    /// Column must contain the label (case-insensitive).
    Contains,
}

impl Category {
    /// All categories, in the order the browse UI pages through them.
    pub const ALL: [Self; 7] = [
        Self::Beauty,
        Self::Fitness,
        Self::Photography,
        Self::Tutoring,
        Self::HomeServices,
        Self::Events,
        Self::Marketplace,
    ];

    /// Returns the canonical label, also used as the backend filter value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beauty => "Beauty",
            Self::Fitness => "Fitness",
            Self::Photography => "Photography",
            Self::Tutoring => "Tutoring",
            Self::HomeServices => "Home Services",
            Self::Events => "Events",
            Self::Marketplace => "Marketplace",
        }
    }

    /// Returns the kebab-case slug accepted on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Beauty => "beauty",
            Self::Fitness => "fitness",
            Self::Photography => "photography",
            Self::Tutoring => "tutoring",
            Self::HomeServices => "home-services",
            Self::Events => "events",
            Self::Marketplace => "marketplace",
        }
    }

    /// Parses a canonical label or slug. Returns `None` for anything else.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label || c.slug() == label)
    }

    /// Storage bucket that raw media references of this category live in.
    #[must_use]
    pub const fn bucket(self) -> &'static str {
        match self {
            Self::Marketplace => MARKETPLACE_BUCKET,
            _ => POST_MEDIA_BUCKET,
        }
    }

    /// Match mode used when querying items of this category.
    ///
    /// Only marketplace listings are matched exactly; provider rows may carry
    /// compound category strings and are matched by substring.
    #[must_use]
    pub const fn filter(self) -> CategoryFilter {
        match self {
            Self::Marketplace => CategoryFilter::Exact,
            _ => CategoryFilter::Contains,
        }
    }

    /// Position within [`Category::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or_default()
    }

    /// The category before this one, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The category after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Immediate neighbours in browse order, without wraparound.
    #[must_use]
    pub fn neighbours(self) -> Vec<Self> {
        self.previous().into_iter().chain(self.next()).collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}
