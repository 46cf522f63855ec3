//! Presentation layer: localized text and Discord message builders.

/// Standalone embeds.
pub mod embeds;
/// Gallery page embeds and buttons.
pub mod gallery_view;
/// English and Arabic message catalog.
pub mod locale;

pub use gallery_view::{GalleryMessage, ViewContext, gallery_message};
pub use locale::Locale;
