//! Shelfwarm - category-based image preloading for marketplace feeds.
//!
//! This crate warms an image cache one content category at a time, reading
//! candidate items from a hosted backend and prefetching their cover images
//! in small, rate-limited batches.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the preloading service.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
