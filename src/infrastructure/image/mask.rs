//! Cover cropping and alpha masks.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::domain::errors::{RenderError, RenderResultOf};

/// Output of [`mask_to_rounded_rect`].
#[derive(Debug, Clone)]
pub enum MaskedImage {
    /// Cover-cropped bitmap with rounded corners.
    Rounded(RgbaImage),
    /// The source is animated and was left untouched.
    Animated,
}

/// Returns true when the bytes carry an animated container.
#[must_use]
pub fn is_animated_bytes(bytes: &[u8]) -> bool {
    matches!(image::guess_format(bytes), Ok(ImageFormat::Gif))
}

/// Decodes raw image bytes.
///
/// # Errors
/// Returns [`RenderError::Decode`] when the format is unknown or corrupt.
pub fn decode(bytes: &[u8]) -> RenderResultOf<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| RenderError::decode(e.to_string()))
}

/// Scales `image` to fully cover `width`×`height`, cropping the centered overflow.
#[must_use]
pub fn cover(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    image
        .resize_to_fill(width, height, FilterType::Triangle)
        .to_rgba8()
}

/// Decodes `bytes`, cover-crops to `width`×`height` and rounds the corners.
///
/// # Errors
/// Returns [`RenderError::Decode`] when the bytes cannot be decoded.
pub fn mask_to_rounded_rect(
    bytes: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> RenderResultOf<MaskedImage> {
    if is_animated_bytes(bytes) {
        return Ok(MaskedImage::Animated);
    }
    let decoded = decode(bytes)?;
    let mut canvas = cover(&decoded, width, height);
    round_corners(&mut canvas, radius);
    Ok(MaskedImage::Rounded(canvas))
}

/// Clears alpha outside each corner's rounding disk.
///
/// Corner centers sit at `radius` from the left/top edges and at
/// `width - radius` / `height - radius` on the right/bottom. Pixels at
/// exactly `radius` from a center stay opaque.
pub fn round_corners(image: &mut RgbaImage, radius: u32) {
    let (width, height) = image.dimensions();
    let r = i64::from(radius);
    let (w, h) = (i64::from(width), i64::from(height));
    let r_sq = r * r;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (x, y) = (i64::from(x), i64::from(y));
        let cx = if x < r {
            r
        } else if x > w - r {
            w - r
        } else {
            continue;
        };
        let cy = if y < r {
            r
        } else if y > h - r {
            h - r
        } else {
            continue;
        };

        let (dx, dy) = (x - cx, y - cy);
        if dx * dx + dy * dy > r_sq {
            pixel.0[3] = 0;
        }
    }
}

/// Clears alpha outside the disk inscribed in a square image.
///
/// Uses pixel centers, so an even-sized avatar is symmetric.
pub fn circle_mask(image: &mut RgbaImage) {
    let size = i64::from(image.width().min(image.height()));
    let size_sq = size * size;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = 2 * i64::from(x) + 1 - size;
        let dy = 2 * i64::from(y) + 1 - size;
        if dx * dx + dy * dy > size_sq {
            pixel.0[3] = 0;
        }
    }
}
