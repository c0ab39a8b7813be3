//! Image prefetch error types.

use thiserror::Error;

/// Errors that can occur while warming the image cache.
#[derive(Debug, Clone, Error)]
pub enum PrefetchError {
    /// Request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-success status.
    #[error("HTTP {status}")]
    Http {
        /// Response status code.
        status: u16,
    },
    /// Payload is not a recognizable image.
    #[error("payload is not an image")]
    NotAnImage,
    /// Local cache could not be written.
    #[error("IO error: {0}")]
    Io(String),
}
