//! Data store error types.

use thiserror::Error;

/// Data store error variants.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("network error talking to the data store: {message}")]
    Network { message: String },

    #[error("data store rejected credentials: {message}")]
    Unauthorized { message: String },

    #[error("rate limited by the data store")]
    RateLimited,

    #[error("data store temporarily unavailable: {message}")]
    Unavailable { message: String },

    #[error("failed to decode data store response: {message}")]
    Decode { message: String },

    #[error("unexpected data store error: {message}")]
    Unexpected { message: String },
}

impl StoreError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether a later retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimited | Self::Unavailable { .. }
        )
    }
}
