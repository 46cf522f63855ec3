//! Image download port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::RenderResultOf;

/// Port for fetching raw image bytes by URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the resource at `url`.
    ///
    /// Non-success statuses are reported as [`crate::domain::errors::RenderError::Network`].
    async fn fetch(&self, url: &str) -> RenderResultOf<Bytes>;
}
