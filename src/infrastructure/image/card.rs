//! Profile card composition.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::domain::entities::{CardRequest, RenderResult, is_animated_url};
use crate::domain::errors::{RenderError, RenderResultOf};
use crate::domain::ports::{CardRenderPort, ImageFetchPort, TextRenderPort, TextStyle};

use super::avatar::AvatarRenderer;
use super::mask::{MaskedImage, mask_to_rounded_rect};

/// Card background.
pub const BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xE8, 0xE8, 0xFF]);
/// Name, likes and footer text.
pub const TEXT_COLOR: Rgba<u8> = Rgba([0x26, 0x26, 0x26, 0xFF]);
/// Solid square standing in for a heart glyph.
pub const HEART_COLOR: Rgba<u8> = Rgba([0xFF, 0x33, 0x66, 0xFF]);

/// Fixed card geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub width: u32,
    pub header_height: u32,
    pub image_height: u32,
    pub image_margin: u32,
    pub image_radius: u32,
    pub likes_height: u32,
    pub footer_height: u32,
    pub avatar_size: u32,
    pub avatar_x: u32,
    pub name_x: u32,
    pub heart_size: u32,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: 350,
            header_height: 40,
            image_height: 250,
            image_margin: 8,
            image_radius: 12,
            likes_height: 15,
            footer_height: 15,
            avatar_size: 30,
            avatar_x: 6,
            name_x: 48,
            heart_size: 10,
        }
    }
}

impl CardLayout {
    /// Total card height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.header_height + self.image_height + self.likes_height + self.footer_height
    }

    /// Width of the image band.
    #[must_use]
    pub const fn image_width(&self) -> u32 {
        self.width - 2 * self.image_margin
    }

    /// Top edge of the likes band.
    #[must_use]
    pub const fn likes_top(&self) -> u32 {
        self.header_height + self.image_height
    }

    /// Top edge of the footer band.
    #[must_use]
    pub const fn footer_top(&self) -> u32 {
        self.likes_top() + self.likes_height
    }

    const fn avatar_y(&self) -> u32 {
        (self.header_height - self.avatar_size) / 2
    }
}

/// Renders profile cards. Never fails: errors become pass-through results.
pub struct CardRenderer {
    layout: CardLayout,
    fetcher: Arc<dyn ImageFetchPort>,
    avatars: Arc<AvatarRenderer>,
    text: Arc<dyn TextRenderPort>,
}

impl CardRenderer {
    /// Creates a renderer with the default layout.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ImageFetchPort>,
        avatars: Arc<AvatarRenderer>,
        text: Arc<dyn TextRenderPort>,
    ) -> Self {
        Self {
            layout: CardLayout::default(),
            fetcher,
            avatars,
            text,
        }
    }

    /// Card geometry.
    #[must_use]
    pub const fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Composes the card for `request`.
    ///
    /// Animated sources short-circuit before any avatar or text work.
    pub async fn compose(&self, request: &CardRequest) -> RenderResult {
        if is_animated_url(&request.source_url) {
            debug!(url = %request.source_url, "Animated source, passing through");
            return RenderResult::animated(&request.source_url);
        }

        match self.try_compose(request).await {
            Ok(Some(png)) => RenderResult::Bitmap(png),
            Ok(None) => {
                debug!(url = %request.source_url, "Animated content sniffed, passing through");
                RenderResult::animated(&request.source_url)
            }
            Err(e) => {
                warn!(url = %request.source_url, error = %e, "Card composition failed");
                RenderResult::processing_failed(&request.source_url)
            }
        }
    }

    async fn try_compose(&self, request: &CardRequest) -> RenderResultOf<Option<Bytes>> {
        let layout = self.layout;
        let bytes = self.fetcher.fetch(&request.source_url).await?;

        let masked = tokio::task::spawn_blocking(move || {
            mask_to_rounded_rect(
                &bytes,
                layout.image_width(),
                layout.image_height,
                layout.image_radius,
            )
        })
        .await
        .map_err(|e| RenderError::decode(format!("Mask task failed: {e}")))??;

        let photo = match masked {
            MaskedImage::Rounded(photo) => photo,
            MaskedImage::Animated => return Ok(None),
        };

        let avatar = self
            .avatars
            .prepare(&request.avatar_url, layout.avatar_size, &request.display_name)
            .await;

        let text = Arc::clone(&self.text);
        let request = request.clone();
        tokio::task::spawn_blocking(move || {
            let card = draw_card(&layout, text.as_ref(), &photo, &avatar, &request);
            encode_png(&card)
        })
        .await
        .map_err(|e| RenderError::decode(format!("Compose task failed: {e}")))?
        .map(Some)
    }
}

#[async_trait]
impl CardRenderPort for CardRenderer {
    async fn render(&self, request: &CardRequest) -> RenderResult {
        self.compose(request).await
    }
}

/// Paints every band of the card onto a fresh canvas.
#[must_use]
pub fn draw_card(
    layout: &CardLayout,
    text: &dyn TextRenderPort,
    photo: &RgbaImage,
    avatar: &RgbaImage,
    request: &CardRequest,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height(), BACKGROUND);

    image::imageops::overlay(
        &mut canvas,
        avatar,
        i64::from(layout.avatar_x),
        i64::from(layout.avatar_y()),
    );
    draw_line(
        &mut canvas,
        text,
        &request.display_name,
        TextStyle::bold(16.0, TEXT_COLOR),
        Placement::Left(layout.name_x),
        0,
        layout.header_height,
    );

    image::imageops::overlay(
        &mut canvas,
        photo,
        i64::from(layout.image_margin),
        i64::from(layout.header_height),
    );

    let heart_top = layout.likes_top() + (layout.likes_height - layout.heart_size) / 2;
    for y in heart_top..heart_top + layout.heart_size {
        for x in layout.image_margin..layout.image_margin + layout.heart_size {
            canvas.put_pixel(x, y, HEART_COLOR);
        }
    }
    draw_line(
        &mut canvas,
        text,
        &format!("{} likes", request.like_count),
        TextStyle::bold(12.0, TEXT_COLOR),
        Placement::Left(layout.image_margin + layout.heart_size + 5),
        layout.likes_top(),
        layout.likes_height,
    );

    if let Some(label) = request.position.label() {
        draw_line(
            &mut canvas,
            text,
            &label,
            TextStyle::regular(10.0, TEXT_COLOR),
            Placement::Center,
            layout.footer_top(),
            layout.footer_height,
        );
    }

    canvas
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Left(u32),
    Center,
}

/// Draws one line vertically centered in the band starting at `top`.
/// Glyphs spilling past the band are clipped by the band itself.
fn draw_line(
    canvas: &mut RgbaImage,
    text: &dyn TextRenderPort,
    content: &str,
    style: TextStyle,
    placement: Placement,
    top: u32,
    band_height: u32,
) {
    let Some(line) = text.rasterize(content, style) else {
        return;
    };

    let line_height = line.height().min(band_height);
    let line = image::imageops::crop_imm(&line, 0, 0, line.width(), line_height).to_image();

    let x = match placement {
        Placement::Left(x) => i64::from(x),
        Placement::Center => (i64::from(canvas.width()) - i64::from(line.width())) / 2,
    };
    let y = i64::from(top) + (i64::from(band_height) - i64::from(line_height)) / 2;
    image::imageops::overlay(canvas, &line, x, y);
}

/// Flattens to RGB and encodes at maximum PNG compression.
///
/// # Errors
/// Returns [`RenderError::Decode`] if encoding fails.
pub fn encode_png(card: &RgbaImage) -> RenderResultOf<Bytes> {
    let rgb = DynamicImage::ImageRgba8(card.clone()).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive);
    rgb.write_with_encoder(encoder)
        .map_err(|e| RenderError::decode(format!("PNG encode failed: {e}")))?;
    Ok(Bytes::from(out.into_inner()))
}
