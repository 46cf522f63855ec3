//! Gallery image commands: upload, delete and reorder.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::UploadOutcome;
use crate::application::services::validation::{
    sanitize_filename, validate_attachment, validate_position,
};
use crate::domain::entities::{AttachmentInfo, Caller};
use crate::domain::errors::ProfileError;
use crate::domain::ports::{NewImage, ProfileStorePort, UploadSinkPort};
use crate::domain::reorder::move_item;
use crate::infrastructure::config::LimitsConfig;

/// Handles `/upload`, `/deleteimage` and `/reorder`.
#[derive(Clone)]
pub struct ImagesUseCase {
    store: Arc<dyn ProfileStorePort>,
    sink: Arc<dyn UploadSinkPort>,
    limits: LimitsConfig,
}

impl ImagesUseCase {
    #[must_use]
    pub const fn new(
        store: Arc<dyn ProfileStorePort>,
        sink: Arc<dyn UploadSinkPort>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            store,
            sink,
            limits,
        }
    }

    /// Re-hosts `attachment` and appends it to the caller's gallery.
    ///
    /// # Errors
    /// Fails when the caller lacks the role, the gallery is full, the
    /// attachment is rejected, or the upload or insert fails.
    pub async fn upload(
        &self,
        caller: &Caller,
        attachment: &AttachmentInfo,
    ) -> Result<UploadOutcome, ProfileError> {
        if !caller.can_edit_profile() {
            return Err(ProfileError::NotPermitted);
        }

        self.store.ensure_user(caller.id).await?;

        let count = self.store.count_images(caller.id).await?;
        if count >= self.limits.max_images {
            return Err(ProfileError::ImageLimitReached {
                max: self.limits.max_images,
            });
        }

        validate_attachment(attachment, &self.limits).map_err(ProfileError::InvalidAttachment)?;

        let mut sanitized = attachment.clone();
        sanitized.filename = sanitize_filename(&attachment.filename);

        let uploaded = self.sink.store_image(caller.id, &sanitized).await.map_err(|e| {
            warn!(user = %caller.id, error = %e, "Attachment re-upload failed");
            e
        })?;

        let image = self
            .store
            .add_image(NewImage {
                owner: caller.id,
                url: uploaded.url,
                original_name: Some(attachment.filename.clone()),
            })
            .await?;

        info!(
            user = %caller.id,
            image = %image,
            size = uploaded.size,
            message_id = uploaded.message_id,
            "Image uploaded"
        );

        Ok(UploadOutcome {
            image,
            count: count + 1,
            max: self.limits.max_images,
        })
    }

    /// Deletes the image at one-based `position`.
    ///
    /// # Errors
    /// Fails when the caller has no images or the position is invalid.
    pub async fn delete(&self, caller: &Caller, position: usize) -> Result<(), ProfileError> {
        let images = self.store.list_images(caller.id).await?;
        if images.is_empty() {
            return Err(ProfileError::NoImages);
        }
        validate_position(position, images.len())?;

        let target = &images[position - 1];
        if !self.store.delete_image(target.id, caller.id).await? {
            return Err(ProfileError::ImageNotFound);
        }

        info!(user = %caller.id, image = %target.id, position, "Image deleted");
        Ok(())
    }

    /// Moves the image at `from` to `to`, both one-based.
    ///
    /// # Errors
    /// Fails when the caller has no images or a position is invalid.
    pub async fn reorder(&self, caller: &Caller, from: usize, to: usize) -> Result<(), ProfileError> {
        let images = self.store.list_images(caller.id).await?;
        if images.is_empty() {
            return Err(ProfileError::NoImages);
        }

        let mut ids: Vec<_> = images.iter().map(|image| image.id).collect();
        move_item(&mut ids, from, to)?;
        self.store.reorder_images(caller.id, &ids).await?;

        debug!(user = %caller.id, from, to, "Images reordered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CallerFlags, UserId};
    use crate::domain::errors::{AttachmentRule, UploadError};
    use crate::domain::ports::mocks::MockUploadSink;
    use crate::infrastructure::persistence::SqliteProfileStore;

    const USER: UserId = UserId(7);

    fn member() -> Caller {
        Caller::new(USER, CallerFlags::ALLOWED_ROLE)
    }

    fn attachment(name: &str) -> AttachmentInfo {
        AttachmentInfo {
            filename: name.to_string(),
            url: format!("https://cdn.discordapp.com/attachments/1/2/{name}"),
            size: 2048,
            content_type: Some("image/png".to_string()),
        }
    }

    async fn use_case(sink: Arc<MockUploadSink>) -> (ImagesUseCase, Arc<dyn ProfileStorePort>) {
        let store: Arc<dyn ProfileStorePort> = Arc::new(SqliteProfileStore::in_memory().await.unwrap());
        let use_case = ImagesUseCase::new(Arc::clone(&store), sink, LimitsConfig::default());
        (use_case, store)
    }

    async fn urls(store: &Arc<dyn ProfileStorePort>) -> Vec<String> {
        store
            .list_images(USER)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.url)
            .collect()
    }

    #[tokio::test]
    async fn test_upload_requires_role() {
        let (use_case, _) = use_case(Arc::new(MockUploadSink::new())).await;
        let caller = Caller::new(USER, CallerFlags::empty());

        let result = use_case.upload(&caller, &attachment("a.png")).await;
        assert!(matches!(result, Err(ProfileError::NotPermitted)));
    }

    #[tokio::test]
    async fn test_upload_stores_sanitized_copy() {
        let sink = Arc::new(MockUploadSink::new());
        let (use_case, store) = use_case(Arc::clone(&sink)).await;

        let outcome = use_case.upload(&member(), &attachment("my pic.png")).await.unwrap();

        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.max, 3);
        assert_eq!(sink.stored()[0].original_name, "my_pic.png");
        assert_eq!(
            urls(&store).await,
            vec!["https://cdn.example.test/stored/1/my_pic.png".to_string()]
        );
        let image = store.get_image(outcome.image).await.unwrap().unwrap();
        assert_eq!(image.original_name.as_deref(), Some("my pic.png"));
    }

    #[tokio::test]
    async fn test_upload_limit() {
        let (use_case, _) = use_case(Arc::new(MockUploadSink::new())).await;
        for i in 0..3 {
            use_case
                .upload(&member(), &attachment(&format!("{i}.png")))
                .await
                .unwrap();
        }

        let result = use_case.upload(&member(), &attachment("4.png")).await;
        assert!(matches!(result, Err(ProfileError::ImageLimitReached { max: 3 })));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_type_before_upload() {
        let sink = Arc::new(MockUploadSink::new());
        let (use_case, _) = use_case(Arc::clone(&sink)).await;
        let mut file = attachment("doc.pdf");
        file.content_type = Some("application/pdf".to_string());

        let result = use_case.upload(&member(), &file).await;

        assert!(matches!(
            result,
            Err(ProfileError::InvalidAttachment(AttachmentRule::UnsupportedType))
        ));
        assert!(sink.stored().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_storage_channel() {
        let (use_case, store) = use_case(Arc::new(MockUploadSink::unconfigured())).await;

        let result = use_case.upload(&member(), &attachment("a.png")).await;

        assert!(matches!(
            result,
            Err(ProfileError::Upload(UploadError::NotConfigured))
        ));
        assert!(urls(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_compacts() {
        let (use_case, store) = use_case(Arc::new(MockUploadSink::new())).await;
        for name in ["a.png", "b.png", "c.png"] {
            use_case.upload(&member(), &attachment(name)).await.unwrap();
        }

        use_case.delete(&member(), 2).await.unwrap();

        let images = store.list_images(USER).await.unwrap();
        assert_eq!(images.len(), 2);
        assert!(images[0].url.ends_with("a.png"));
        assert!(images[1].url.ends_with("c.png"));
        assert_eq!(images[1].position, 1);
    }

    #[tokio::test]
    async fn test_delete_errors() {
        let (use_case, _) = use_case(Arc::new(MockUploadSink::new())).await;
        assert!(matches!(
            use_case.delete(&member(), 1).await,
            Err(ProfileError::NoImages)
        ));

        use_case.upload(&member(), &attachment("a.png")).await.unwrap();
        assert!(matches!(
            use_case.delete(&member(), 2).await,
            Err(ProfileError::PositionOutOfRange { count: 1 })
        ));
    }

    #[tokio::test]
    async fn test_reorder_moves_first_to_last() {
        let (use_case, store) = use_case(Arc::new(MockUploadSink::new())).await;
        for name in ["a.png", "b.png", "c.png"] {
            use_case.upload(&member(), &attachment(name)).await.unwrap();
        }

        use_case.reorder(&member(), 1, 3).await.unwrap();

        let names: Vec<_> = urls(&store)
            .await
            .iter()
            .map(|u| u.rsplit('/').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["b.png", "c.png", "a.png"]);
    }

    #[tokio::test]
    async fn test_reorder_same_position() {
        let (use_case, _) = use_case(Arc::new(MockUploadSink::new())).await;
        use_case.upload(&member(), &attachment("a.png")).await.unwrap();
        use_case.upload(&member(), &attachment("b.png")).await.unwrap();

        assert!(matches!(
            use_case.reorder(&member(), 2, 2).await,
            Err(ProfileError::SamePosition)
        ));
        assert!(matches!(
            use_case.reorder(&member(), 1, 5).await,
            Err(ProfileError::PositionOutOfRange { count: 2 })
        ));
    }
}
