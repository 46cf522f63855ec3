//! Platform upload sink port definition.

use async_trait::async_trait;

use crate::domain::entities::{AttachmentInfo, ProfileBackup, UploadedImage, UserId};
use crate::domain::errors::UploadError;

/// Port for re-hosting user attachments on the platform.
#[async_trait]
pub trait UploadSinkPort: Send + Sync {
    /// Copies `attachment` into the storage channel and returns its stable URL.
    async fn store_image(
        &self,
        owner: UserId,
        attachment: &AttachmentInfo,
    ) -> Result<UploadedImage, UploadError>;

    /// Posts a JSON snapshot of a profile to the storage channel.
    async fn backup_profile(&self, backup: &ProfileBackup) -> Result<(), UploadError>;
}
