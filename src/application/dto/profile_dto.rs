//! Results handed from use cases to the Discord adapter.

use crate::domain::entities::{Comment, GalleryImage, ImageId, Quote, RenderResult, UserId};
use crate::domain::ports::PurgeSummary;

/// Who is looking at which gallery, and how to label it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryQuery {
    pub owner: UserId,
    /// Platform display name of the owner, used when no username is set.
    pub owner_display_name: String,
    pub owner_avatar_url: String,
    pub viewer: UserId,
    /// Zero-based image index.
    pub index: usize,
    /// Whether to compose a card or show the stored image as-is.
    pub render_card: bool,
}

/// A profile without images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyProfile {
    pub owner: UserId,
    pub username: Option<String>,
    pub quotes: Vec<Quote>,
    pub max_images: usize,
}

/// One image of a gallery with everything needed to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPage {
    pub owner: UserId,
    /// Username, or the owner's platform display name.
    pub title_name: String,
    pub index: usize,
    pub total: usize,
    pub image: GalleryImage,
    pub is_animated: bool,
    pub quotes: Vec<Quote>,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub viewer_liked: bool,
    /// `None` when the stored image is shown without a card.
    pub render: Option<RenderResult>,
}

impl GalleryPage {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index + 1 < self.total
    }

    /// One-based position shown to users.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index + 1
    }
}

/// Either an empty profile or a page of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    Empty(EmptyProfile),
    Page(Box<GalleryPage>),
}

/// Result of `/upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    pub image: ImageId,
    pub count: usize,
    pub max: usize,
}

/// Result of adding a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteOutcome {
    pub count: usize,
    pub max: usize,
}

/// Result of toggling a like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    /// The image after the toggle, with its new like count.
    pub image: GalleryImage,
    /// Zero-based index of the image in its owner's gallery.
    pub index: usize,
    pub liked: bool,
    /// Set when someone other than the owner added a like.
    pub notify_owner: bool,
}

/// Result of an administrator reset.
pub type ResetOutcome = PurgeSummary;
