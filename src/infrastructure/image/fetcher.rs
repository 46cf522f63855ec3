//! HTTP image fetching with a shared download cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace};

use crate::domain::errors::{RenderError, RenderResultOf};
use crate::domain::ports::ImageFetchPort;

use super::bounded_cache::BoundedCache;

/// Downloads images over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    http_client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher. Without `timeout_secs` requests keep reqwest's
    /// defaults and have no overall deadline.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout_secs: Option<u64>) -> RenderResultOf<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| RenderError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> RenderResultOf<Bytes> {
        debug!(url = %url, "Downloading image");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| RenderError::network(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RenderError::network(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| RenderError::network(format!("Failed to read body: {e}")))
    }
}

/// Download cache keyed by source URL.
pub type DownloadCache = BoundedCache<String, Bytes>;

/// Fetcher that consults the download cache before the network.
///
/// Concurrent misses for the same URL may both download; the later
/// write replaces the earlier one.
pub struct CachingFetcher {
    inner: Arc<dyn ImageFetchPort>,
    cache: Arc<DownloadCache>,
}

impl CachingFetcher {
    /// Wraps `inner` with `cache`.
    #[must_use]
    pub fn new(inner: Arc<dyn ImageFetchPort>, cache: Arc<DownloadCache>) -> Self {
        Self { inner, cache }
    }

    /// The shared download cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<DownloadCache> {
        &self.cache
    }
}

#[async_trait]
impl ImageFetchPort for CachingFetcher {
    async fn fetch(&self, url: &str) -> RenderResultOf<Bytes> {
        if let Some(bytes) = self.cache.get(&url.to_string()) {
            trace!(url = %url, "Serving download from cache");
            return Ok(bytes);
        }
        let bytes = self.inner.fetch(url).await?;
        self.cache.insert(url.to_string(), bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockImageFetchPort;

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let mut inner = MockImageFetchPort::new();
        inner
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(Bytes::from_static(b"payload")));

        let fetcher = CachingFetcher::new(
            Arc::new(inner),
            Arc::new(DownloadCache::new("downloads", 4)),
        );

        let first = fetcher.fetch("https://example.test/a.png").await.unwrap();
        let second = fetcher.fetch("https://example.test/a.png").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let mut inner = MockImageFetchPort::new();
        inner
            .expect_fetch()
            .times(2)
            .returning(|_| Err(RenderError::network("HTTP 404")));

        let fetcher = CachingFetcher::new(
            Arc::new(inner),
            Arc::new(DownloadCache::new("downloads", 4)),
        );

        assert!(fetcher.fetch("https://example.test/a.png").await.is_err());
        assert!(fetcher.fetch("https://example.test/a.png").await.is_err());
        assert!(fetcher.cache().is_empty());
    }

    #[test]
    fn test_fetcher_builds_with_and_without_deadline() {
        assert!(HttpImageFetcher::new(None).is_ok());
        assert!(HttpImageFetcher::new(Some(5)).is_ok());
    }
}
