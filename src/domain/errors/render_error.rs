//! Card rendering error types.

use thiserror::Error;

/// Result type for image pipeline operations.
pub type RenderResultOf<T> = std::result::Result<T, RenderError>;

/// Failures inside the image pipeline.
///
/// Animated sources are not errors; they are routed through
/// [`crate::domain::entities::RenderResult::PassThrough`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Bytes could not be decoded, or compositing/encoding failed.
    #[error("decode error: {0}")]
    Decode(String),
    /// Download failed or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),
    /// A cached value no longer matches its expected shape.
    #[error("cache corruption: {0}")]
    CacheCorruption(String),
}

impl RenderError {
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    #[must_use]
    pub fn cache_corruption(message: impl Into<String>) -> Self {
        Self::CacheCorruption(message.into())
    }

    /// Returns whether retrying the same input could succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::CacheCorruption(_))
    }
}
