//! Likes and comments on gallery images.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::application::dto::LikeOutcome;
use crate::application::services::validation::validate_text;
use crate::domain::entities::{Comment, GalleryImage, ImageId, UserId};
use crate::domain::errors::ProfileError;
use crate::domain::ports::{NewComment, ProfileStorePort};

/// Handles the like button and the comment modal.
#[derive(Clone)]
pub struct EngagementUseCase {
    store: Arc<dyn ProfileStorePort>,
    max_comment_length: usize,
}

impl EngagementUseCase {
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStorePort>, max_comment_length: usize) -> Self {
        Self {
            store,
            max_comment_length,
        }
    }

    async fn image(&self, id: ImageId) -> Result<GalleryImage, ProfileError> {
        self.store
            .get_image(id)
            .await?
            .ok_or(ProfileError::ImageNotFound)
    }

    /// Likes `image` if `user` has not, otherwise removes the like.
    ///
    /// # Errors
    /// Fails when the image no longer exists.
    pub async fn toggle_like(&self, image: ImageId, user: UserId) -> Result<LikeOutcome, ProfileError> {
        self.store.ensure_user(user).await?;
        let before = self.image(image).await?;

        let liked = if self.store.has_liked(image, user).await? {
            self.store.unlike(image, user).await?;
            false
        } else {
            self.store.like(image, user).await?
        };

        let updated = self.image(image).await?;
        let index = self
            .store
            .list_images(updated.owner)
            .await?
            .iter()
            .position(|i| i.id == image)
            .ok_or(ProfileError::ImageNotFound)?;

        debug!(
            image = %image,
            user = %user,
            liked,
            likes_before = before.like_count,
            likes = updated.like_count,
            "Like toggled"
        );

        Ok(LikeOutcome {
            notify_owner: liked && updated.owner != user,
            image: updated,
            index,
            liked,
        })
    }

    /// Stores a comment and returns it.
    ///
    /// # Errors
    /// Fails when the text length is invalid or the image is gone.
    pub async fn comment(
        &self,
        image: ImageId,
        author: UserId,
        text: &str,
    ) -> Result<Comment, ProfileError> {
        let text = validate_text(text, self.max_comment_length)?;
        self.image(image).await?;

        let comment = self
            .store
            .add_comment(NewComment {
                image,
                author,
                text: text.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        info!(image = %image, author = %author, "Comment added");
        Ok(comment)
    }

    /// Checks that `image` still exists before opening the comment modal.
    ///
    /// # Errors
    /// Returns [`ProfileError::ImageNotFound`] for deleted images.
    pub async fn ensure_commentable(&self, image: ImageId) -> Result<(), ProfileError> {
        self.image(image).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NewImage;
    use crate::infrastructure::persistence::SqliteProfileStore;

    const OWNER: UserId = UserId(1);
    const FAN: UserId = UserId(2);

    async fn setup(images: usize) -> (EngagementUseCase, Vec<ImageId>) {
        let store: Arc<dyn ProfileStorePort> =
            Arc::new(SqliteProfileStore::in_memory().await.unwrap());
        let mut ids = Vec::new();
        for i in 0..images {
            ids.push(
                store
                    .add_image(NewImage {
                        owner: OWNER,
                        url: format!("https://x/{i}.png"),
                        original_name: None,
                    })
                    .await
                    .unwrap(),
            );
        }
        (EngagementUseCase::new(store, 300), ids)
    }

    #[tokio::test]
    async fn test_like_then_unlike() {
        let (engagement, ids) = setup(2).await;

        let first = engagement.toggle_like(ids[1], FAN).await.unwrap();
        assert!(first.liked);
        assert!(first.notify_owner);
        assert_eq!(first.index, 1);
        assert_eq!(first.image.like_count, 1);

        let second = engagement.toggle_like(ids[1], FAN).await.unwrap();
        assert!(!second.liked);
        assert!(!second.notify_owner);
        assert_eq!(second.image.like_count, 0);
    }

    #[tokio::test]
    async fn test_self_like_does_not_notify() {
        let (engagement, ids) = setup(1).await;
        let outcome = engagement.toggle_like(ids[0], OWNER).await.unwrap();
        assert!(outcome.liked);
        assert!(!outcome.notify_owner);
    }

    #[tokio::test]
    async fn test_missing_image() {
        let (engagement, _) = setup(0).await;
        assert!(matches!(
            engagement.toggle_like(ImageId(99), FAN).await,
            Err(ProfileError::ImageNotFound)
        ));
        assert!(matches!(
            engagement.comment(ImageId(99), FAN, "nice").await,
            Err(ProfileError::ImageNotFound)
        ));
    }

    #[tokio::test]
    async fn test_comment_length() {
        let (engagement, ids) = setup(1).await;
        let comment = engagement.comment(ids[0], FAN, " great shot ").await.unwrap();
        assert_eq!(comment.text, "great shot");
        assert_eq!(comment.author, FAN);

        assert!(matches!(
            engagement.comment(ids[0], FAN, &"x".repeat(301)).await,
            Err(ProfileError::TextLength { max: 300 })
        ));
    }
}
