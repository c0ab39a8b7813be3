//! Application layer with services driving the domain ports.

/// Application services.
pub mod services;

pub use services::{CategoryImageCache, PreloadConfig};
