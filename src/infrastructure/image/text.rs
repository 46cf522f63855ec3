//! Single-line text rasterization through resvg.

use std::fmt::Write;
use std::sync::LazyLock;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia;
use resvg::usvg;
use tracing::{trace, warn};

use crate::domain::ports::{TextRenderPort, TextStyle};

/// Font stack covering Latin and Arabic display names.
const FONT_FAMILY: &str =
    "'Noto Sans', 'Noto Sans Arabic', 'DejaVu Sans', 'Segoe UI', 'Arial', sans-serif";

/// Overestimated advance per character, as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f32 = 0.7;

/// Widest line ever drawn on a card.
const MAX_LINE_WIDTH: u32 = 400;

static SVG_OPTIONS: LazyLock<usvg::Options> = LazyLock::new(|| {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt
});

/// Loads the system font database.
///
/// Scanning fonts can block for a while, so call this once at startup
/// from a blocking context.
pub fn init_fonts() {
    LazyLock::force(&SVG_OPTIONS);
}

/// Rasterizes text with system fonts.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgTextRenderer;

impl SvgTextRenderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextRenderPort for SvgTextRenderer {
    fn rasterize(&self, text: &str, style: TextStyle) -> Option<RgbaImage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let svg = build_svg(text, style);
        match rasterize_svg(&svg) {
            Ok(image) => {
                let cropped = crop_to_content(&image);
                if cropped.is_none() {
                    trace!(text = %text, "No glyphs rendered, fonts unavailable");
                }
                cropped
            }
            Err(e) => {
                warn!(error = %e, "Text render failed");
                None
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn build_svg(text: &str, style: TextStyle) -> String {
    let chars = text.chars().count() as f32;
    let width = ((chars * style.size * CHAR_WIDTH_FACTOR).ceil() as u32 + 4).min(MAX_LINE_WIDTH);
    let height = (style.size * 1.35).ceil() as u32;
    let baseline = style.size;
    let [r, g, b, a] = style.color.0;
    let opacity = f32::from(a) / 255.0;
    let weight = if style.bold { "700" } else { "400" };

    let mut s = String::with_capacity(256);
    let _ = write!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#,
    );
    let _ = write!(
        s,
        r##"<text x="0" y="{baseline}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="{weight}" fill="#{r:02X}{g:02X}{b:02X}" fill-opacity="{opacity}">{}</text>"##,
        style.size,
        escape_xml(text),
    );
    s.push_str("</svg>");
    s
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rasterize_svg(svg: &str) -> Result<RgbaImage, String> {
    let tree = usvg::Tree::from_data(svg.as_bytes(), &SVG_OPTIONS)
        .map_err(|e| format!("SVG parse: {e}"))?;

    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or("pixmap allocation failed")?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let pixels = pixmap.pixels();
    let width = pixmap.width();
    Ok(RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let idx = (y * width + x) as usize;
        let c = pixels[idx].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    }))
}

/// Trims transparent columns on the right. Keeps full height so the
/// baseline stays where the layout expects it.
fn crop_to_content(image: &RgbaImage) -> Option<RgbaImage> {
    let last_column = (0..image.width())
        .rev()
        .find(|&x| (0..image.height()).any(|y| image.get_pixel(x, y).0[3] > 0))?;
    Some(image::imageops::crop_imm(image, 0, 0, last_column + 1, image.height()).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }

    #[test]
    fn test_build_svg_contains_escaped_text() {
        let svg = build_svg("7 <likes>", TextStyle::bold(12.0, Rgba([0x26, 0x26, 0x26, 255])));

        assert!(svg.contains("7 &lt;likes&gt;"));
        assert!(svg.contains("font-weight=\"700\""));
        assert!(svg.contains("#262626"));
    }

    #[test]
    fn test_blank_text_renders_nothing() {
        let renderer = SvgTextRenderer::new();
        assert!(
            renderer
                .rasterize("   ", TextStyle::regular(12.0, Rgba([0, 0, 0, 255])))
                .is_none()
        );
    }

    #[test]
    fn test_rendered_line_fits_height() {
        let renderer = SvgTextRenderer::new();
        // Hosts without fonts render nothing, which is a valid outcome.
        if let Some(line) = renderer.rasterize("2 of 5", TextStyle::regular(10.0, Rgba([0, 0, 0, 255]))) {
            assert_eq!(line.height(), 14);
            assert!(line.width() <= MAX_LINE_WIDTH);
        }
    }

    #[test]
    fn test_crop_to_content_of_empty_image() {
        let image = RgbaImage::new(10, 10);
        assert!(crop_to_content(&image).is_none());
    }
}
