//! Text rasterization port definition.

use image::{Rgba, RgbaImage};

/// Visual parameters for one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Rgba<u8>,
    /// Whether to use a bold weight.
    pub bold: bool,
}

impl TextStyle {
    /// Regular weight text.
    #[must_use]
    pub const fn regular(size: f32, color: Rgba<u8>) -> Self {
        Self {
            size,
            color,
            bold: false,
        }
    }

    /// Bold weight text.
    #[must_use]
    pub const fn bold(size: f32, color: Rgba<u8>) -> Self {
        Self {
            size,
            color,
            bold: true,
        }
    }
}

/// Port for turning a single line of text into a transparent bitmap.
#[cfg_attr(test, mockall::automock)]
pub trait TextRenderPort: Send + Sync {
    /// Rasterizes `text`. Returns `None` when no font can render it.
    fn rasterize(&self, text: &str, style: TextStyle) -> Option<RgbaImage>;
}
