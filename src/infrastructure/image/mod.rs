//! Image handling infrastructure.
//!
//! This module provides:
//! - Insertion-ordered bounded caches for downloads and avatars
//! - HTTP fetching and Discord CDN URL helpers
//! - Rounded and circular masking
//! - Card composition and a periodic cache sweeper

pub mod avatar;
pub mod bounded_cache;
pub mod card;
pub mod discord_cdn;
pub mod fetcher;
pub mod mask;
pub mod sweeper;
pub mod text;

use std::sync::Arc;
use std::time::Duration;

pub use avatar::{AvatarCache, AvatarRenderer};
pub use bounded_cache::{BoundedCache, CacheStats, DEFAULT_CACHE_SIZE, SweepableCache};
pub use card::{CardLayout, CardRenderer};
pub use fetcher::{CachingFetcher, DownloadCache, HttpImageFetcher};
pub use mask::{MaskedImage, mask_to_rounded_rect};
pub use sweeper::CacheSweeper;
pub use text::{SvgTextRenderer, init_fonts};

use crate::domain::errors::RenderResultOf;
use crate::domain::ports::{ImageFetchPort, TextRenderPort};
use crate::infrastructure::config::CacheConfig;

/// The card renderer wired to its process-wide caches.
pub struct ImagePipeline {
    renderer: Arc<CardRenderer>,
    downloads: Arc<DownloadCache>,
    avatars: Arc<AvatarCache>,
    sweep_period: Duration,
}

impl ImagePipeline {
    /// Builds the HTTP fetcher, caches and renderer.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &CacheConfig) -> RenderResultOf<Self> {
        let http: Arc<dyn ImageFetchPort> = Arc::new(HttpImageFetcher::new(config.fetch_timeout_secs)?);
        Ok(Self::with_ports(config, http, Arc::new(SvgTextRenderer::new())))
    }

    /// Builds the pipeline around the given network and text ports.
    #[must_use]
    pub fn with_ports(
        config: &CacheConfig,
        network: Arc<dyn ImageFetchPort>,
        text: Arc<dyn TextRenderPort>,
    ) -> Self {
        let downloads = Arc::new(DownloadCache::new("downloads", config.capacity));
        let avatars = Arc::new(AvatarCache::new("avatars", config.capacity));
        let fetcher: Arc<dyn ImageFetchPort> =
            Arc::new(CachingFetcher::new(network, Arc::clone(&downloads)));
        let avatar_renderer = Arc::new(AvatarRenderer::new(
            Arc::clone(&fetcher),
            Arc::clone(&text),
            Arc::clone(&avatars),
        ));
        let renderer = Arc::new(CardRenderer::new(fetcher, avatar_renderer, text));

        Self {
            renderer,
            downloads,
            avatars,
            sweep_period: Duration::from_secs(config.sweep_period_secs),
        }
    }

    /// Shared card renderer.
    #[must_use]
    pub fn renderer(&self) -> Arc<CardRenderer> {
        Arc::clone(&self.renderer)
    }

    /// Sweeper covering every cache of this pipeline.
    #[must_use]
    pub fn sweeper(&self) -> CacheSweeper {
        CacheSweeper::new(
            self.sweep_period,
            vec![
                Arc::clone(&self.downloads) as Arc<dyn SweepableCache>,
                Arc::clone(&self.avatars) as Arc<dyn SweepableCache>,
            ],
        )
    }

    /// Current statistics of the download and avatar caches.
    #[must_use]
    pub fn stats(&self) -> (CacheStats, CacheStats) {
        (self.downloads.stats(), self.avatars.stats())
    }
}
