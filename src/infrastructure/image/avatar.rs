//! Circular avatar preparation with a letter fallback.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::domain::errors::{RenderError, RenderResultOf};
use crate::domain::ports::{ImageFetchPort, TextRenderPort, TextStyle};

use super::bounded_cache::BoundedCache;
use super::discord_cdn::static_avatar_url;
use super::mask::{circle_mask, cover, decode};

/// Fill of the fallback disk.
pub const FALLBACK_COLOR: Rgba<u8> = Rgba([0x66, 0x7E, 0xEA, 0xFF]);

/// Initial drawn on the fallback disk.
pub const FALLBACK_TEXT_COLOR: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Avatar cache keyed by (avatar URL, target size).
pub type AvatarCache = BoundedCache<(String, u32), Arc<RgbaImage>>;

/// Produces circular avatars, memoized per URL and size.
pub struct AvatarRenderer {
    fetcher: Arc<dyn ImageFetchPort>,
    text: Arc<dyn TextRenderPort>,
    cache: Arc<AvatarCache>,
}

impl AvatarRenderer {
    /// Creates a renderer sharing `cache`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ImageFetchPort>,
        text: Arc<dyn TextRenderPort>,
        cache: Arc<AvatarCache>,
    ) -> Self {
        Self {
            fetcher,
            text,
            cache,
        }
    }

    /// The shared avatar cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<AvatarCache> {
        &self.cache
    }

    /// Returns a `size`×`size` circular avatar. Never fails.
    ///
    /// Download or decode failures yield a colored disk with the first
    /// letter of `display_name`.
    pub async fn prepare(&self, avatar_url: &str, size: u32, display_name: &str) -> RgbaImage {
        let key = (avatar_url.to_string(), size);

        if let Some(cached) = self.cache.get(&key) {
            match check_shape(&cached, size) {
                Ok(()) => return (*cached).clone(),
                Err(e) => {
                    warn!(url = %avatar_url, error = %e, "Evicting corrupt avatar entry");
                    self.cache.remove(&key);
                }
            }
        }

        let avatar = Arc::new(match self.download(avatar_url, size).await {
            Ok(avatar) => avatar,
            Err(e) => {
                debug!(url = %avatar_url, error = %e, "Using fallback avatar");
                self.fallback(display_name, size)
            }
        });
        self.cache.insert(key, Arc::clone(&avatar));
        (*avatar).clone()
    }

    async fn download(&self, avatar_url: &str, size: u32) -> RenderResultOf<RgbaImage> {
        let bytes = self.fetcher.fetch(&static_avatar_url(avatar_url, size)).await?;
        tokio::task::spawn_blocking(move || {
            let decoded = decode(&bytes)?;
            let mut avatar = cover(&decoded, size, size);
            circle_mask(&mut avatar);
            Ok(avatar)
        })
        .await
        .map_err(|e| RenderError::decode(format!("Avatar task failed: {e}")))?
    }

    /// Colored disk with a centered initial, or a plain disk without fonts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fallback(&self, display_name: &str, size: u32) -> RgbaImage {
        let mut disk = RgbaImage::from_pixel(size, size, FALLBACK_COLOR);
        circle_mask(&mut disk);

        let initial = display_name
            .chars()
            .find(|c| !c.is_whitespace())
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect());
        let style = TextStyle::bold(size as f32 * 0.5, FALLBACK_TEXT_COLOR);

        if let Some(glyph) = self.text.rasterize(&initial, style) {
            let x = (i64::from(size) - i64::from(glyph.width())) / 2;
            let y = (i64::from(size) - i64::from(glyph.height())) / 2;
            image::imageops::overlay(&mut disk, &glyph, x, y);
        }
        disk
    }
}

fn check_shape(image: &RgbaImage, size: u32) -> RenderResultOf<()> {
    if image.dimensions() == (size, size) {
        Ok(())
    } else {
        Err(RenderError::cache_corruption(format!(
            "expected {size}x{size}, found {}x{}",
            image.width(),
            image.height()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockImageFetchPort, MockTextRenderPort};
    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(size: u32) -> Bytes {
        let img = RgbImage::from_pixel(size, size, Rgb([10, 200, 10]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        Bytes::from(out.into_inner())
    }

    fn silent_text() -> MockTextRenderPort {
        let mut text = MockTextRenderPort::new();
        text.expect_rasterize().returning(|_, _| None);
        text
    }

    fn renderer(fetcher: MockImageFetchPort, text: MockTextRenderPort) -> AvatarRenderer {
        AvatarRenderer::new(
            Arc::new(fetcher),
            Arc::new(text),
            Arc::new(AvatarCache::new("avatars", 50)),
        )
    }

    #[tokio::test]
    async fn test_prepare_twice_fetches_once() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(png_bytes(64)));
        let renderer = renderer(fetcher, silent_text());

        let first = renderer.prepare("https://example.test/a.png", 30, "alice").await;
        let second = renderer.prepare("https://example.test/a.png", 30, "alice").await;

        assert_eq!(first.dimensions(), (30, 30));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_size_is_a_separate_entry() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher
            .expect_fetch()
            .times(2)
            .returning(|_| Ok(png_bytes(64)));
        let renderer = renderer(fetcher, silent_text());

        renderer.prepare("https://example.test/a.png", 30, "alice").await;
        renderer.prepare("https://example.test/a.png", 48, "alice").await;

        assert_eq!(renderer.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_fallback_disk() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(RenderError::network("HTTP 500")));
        let renderer = renderer(fetcher, silent_text());

        let avatar = renderer.prepare("https://example.test/a.png", 30, "bob").await;

        assert_eq!(avatar.dimensions(), (30, 30));
        assert_eq!(*avatar.get_pixel(15, 15), FALLBACK_COLOR);
        assert_eq!(avatar.get_pixel(0, 0).0[3], 0);
    }

    #[tokio::test]
    async fn test_fallback_draws_uppercase_initial() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(Bytes::from_static(b"corrupt")));
        let mut text = MockTextRenderPort::new();
        text.expect_rasterize()
            .withf(|text, _| text.to_string() == "B")
            .times(1)
            .returning(|_, _| Some(RgbaImage::from_pixel(4, 4, FALLBACK_TEXT_COLOR)));
        let renderer = renderer(fetcher, text);

        let avatar = renderer.prepare("https://example.test/a.png", 30, "bob").await;

        assert_eq!(*avatar.get_pixel(14, 14), FALLBACK_TEXT_COLOR);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_regenerated() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(png_bytes(64)));
        let renderer = renderer(fetcher, silent_text());
        renderer.cache().insert(
            ("https://example.test/a.png".to_string(), 30),
            Arc::new(RgbaImage::new(3, 7)),
        );

        let avatar = renderer.prepare("https://example.test/a.png", 30, "alice").await;

        assert_eq!(avatar.dimensions(), (30, 30));
        let cached = renderer
            .cache()
            .get(&("https://example.test/a.png".to_string(), 30))
            .unwrap();
        assert_eq!(cached.dimensions(), (30, 30));
    }

    #[tokio::test]
    async fn test_mutating_returned_avatar_leaves_cache_intact() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher.expect_fetch().returning(|_| Ok(png_bytes(64)));
        let renderer = renderer(fetcher, silent_text());

        let mut avatar = renderer.prepare("https://example.test/a.png", 30, "alice").await;
        avatar.put_pixel(15, 15, Rgba([0, 0, 0, 255]));

        let again = renderer.prepare("https://example.test/a.png", 30, "alice").await;
        assert_ne!(*again.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
    }
}
