//! Profile persistence port definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Comment, GalleryImage, ImageId, ProfileUser, Quote, QuoteId, UserId,
};
use crate::domain::errors::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Rows removed by [`ProfileStorePort::purge_user`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    /// Images deleted, with their likes and comments.
    pub images: u64,
    /// Quotes deleted.
    pub quotes: u64,
    /// Whether the user row carried a username.
    pub had_username: bool,
}

impl PurgeSummary {
    /// Returns true when nothing was stored for the user.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.images == 0 && self.quotes == 0 && !self.had_username
    }
}

/// Fields for a new gallery image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub owner: UserId,
    pub url: String,
    pub original_name: Option<String>,
}

/// Fields for a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub image: ImageId,
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Relational storage for users, images, likes, quotes and comments.
///
/// Positions are zero-based and dense after every mutation that goes
/// through this port. All listing operations return rows ordered by
/// position.
#[async_trait]
pub trait ProfileStorePort: Send + Sync {
    /// Creates the user row if missing.
    async fn ensure_user(&self, user: UserId) -> StoreResult<()>;

    /// Loads a user row.
    async fn get_user(&self, user: UserId) -> StoreResult<Option<ProfileUser>>;

    /// Case-insensitive username lookup.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<ProfileUser>>;

    /// Sets the username, creating the row if missing.
    async fn set_username(&self, user: UserId, username: &str) -> StoreResult<()>;

    /// Appends an image after the owner's current last position.
    async fn add_image(&self, image: NewImage) -> StoreResult<ImageId>;

    /// Lists the owner's images with like counts.
    async fn list_images(&self, owner: UserId) -> StoreResult<Vec<GalleryImage>>;

    /// Loads one image with its like count.
    async fn get_image(&self, id: ImageId) -> StoreResult<Option<GalleryImage>>;

    /// Deletes an image if it belongs to `owner` and compacts positions.
    async fn delete_image(&self, id: ImageId, owner: UserId) -> StoreResult<bool>;

    /// Rewrites positions so `ordered[i]` gets position `i`.
    async fn reorder_images(&self, owner: UserId, ordered: &[ImageId]) -> StoreResult<()>;

    /// Counts the owner's images.
    async fn count_images(&self, owner: UserId) -> StoreResult<usize>;

    /// Records a like. Returns false if it already existed.
    async fn like(&self, image: ImageId, user: UserId) -> StoreResult<bool>;

    /// Removes a like. Returns false if there was none.
    async fn unlike(&self, image: ImageId, user: UserId) -> StoreResult<bool>;

    /// Checks whether `user` liked `image`.
    async fn has_liked(&self, image: ImageId, user: UserId) -> StoreResult<bool>;

    /// Counts likes on an image.
    async fn like_count(&self, image: ImageId) -> StoreResult<u32>;

    /// Appends a quote after the owner's current last position.
    async fn add_quote(&self, owner: UserId, text: &str) -> StoreResult<QuoteId>;

    /// Lists the owner's quotes.
    async fn list_quotes(&self, owner: UserId) -> StoreResult<Vec<Quote>>;

    /// Deletes a quote if it belongs to `owner` and compacts positions.
    async fn delete_quote(&self, id: QuoteId, owner: UserId) -> StoreResult<bool>;

    /// Rewrites quote positions so `ordered[i]` gets position `i`.
    async fn reorder_quotes(&self, owner: UserId, ordered: &[QuoteId]) -> StoreResult<()>;

    /// Counts the owner's quotes.
    async fn count_quotes(&self, owner: UserId) -> StoreResult<usize>;

    /// Stores a comment.
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    /// Latest comments on an image, newest first.
    async fn list_comments(&self, image: ImageId, limit: u32) -> StoreResult<Vec<Comment>>;

    /// Deletes everything stored for `owner`.
    async fn purge_user(&self, owner: UserId) -> StoreResult<PurgeSummary>;
}
