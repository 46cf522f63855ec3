//! Gallery image entities.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Database identifier of a gallery image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub i64);

impl ImageId {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image in a user's gallery, with its current like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: ImageId,
    pub owner: UserId,
    /// Stable retrieval URL obtained from the upload sink.
    pub url: String,
    pub original_name: Option<String>,
    /// Zero-based ordering key within the owner's gallery.
    pub position: i32,
    pub like_count: u32,
}

/// A user-submitted attachment, before re-upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Result of re-uploading an attachment to the storage channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub original_name: String,
    pub size: u64,
    pub message_id: u64,
}
