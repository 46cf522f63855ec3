//! Storage channel uploads through the Discord HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateAttachment, CreateMessage, Http, HttpError};
use tracing::{debug, warn};

use crate::domain::entities::{AttachmentInfo, ProfileBackup, UploadedImage, UserId};
use crate::domain::errors::UploadError;
use crate::domain::ports::UploadSinkPort;

/// Re-hosts attachments and backups in a dedicated channel.
pub struct SerenityUploadSink {
    http: Arc<Http>,
    channel: Option<ChannelId>,
}

impl SerenityUploadSink {
    #[must_use]
    pub fn new(http: Arc<Http>, channel_id: Option<u64>) -> Self {
        if channel_id.is_none() {
            warn!("No storage channel configured, uploads and backups are disabled");
        }
        Self {
            http,
            channel: channel_id.filter(|id| *id != 0).map(ChannelId::new),
        }
    }

    fn channel(&self) -> Result<ChannelId, UploadError> {
        self.channel.ok_or(UploadError::NotConfigured)
    }
}

/// Text posted next to a re-uploaded image.
pub(crate) fn upload_caption(owner: UserId, filename: &str) -> String {
    format!("📷 Image uploaded by <@{owner}> - {filename}")
}

/// Backup message body with the snapshot as a JSON code block.
pub(crate) fn backup_content(backup: &ProfileBackup) -> Result<String, UploadError> {
    let json = serde_json::to_string_pretty(backup)
        .map_err(|e| UploadError::Failed(format!("backup serialization: {e}")))?;
    Ok(format!(
        "🔒 **Backup Data** for <@{}>\n```json\n{json}\n```",
        backup.user_id
    ))
}

fn map_error(err: serenity::Error) -> UploadError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if matches!(response.status_code.as_u16(), 403 | 404) =>
        {
            UploadError::ChannelUnavailable(response.error.message.clone())
        }
        _ => UploadError::Failed(err.to_string()),
    }
}

#[async_trait]
impl UploadSinkPort for SerenityUploadSink {
    async fn store_image(
        &self,
        owner: UserId,
        attachment: &AttachmentInfo,
    ) -> Result<UploadedImage, UploadError> {
        let channel = self.channel()?;

        let mut file = CreateAttachment::url(&self.http, &attachment.url)
            .await
            .map_err(map_error)?;
        file.filename.clone_from(&attachment.filename);

        let message = channel
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(upload_caption(owner, &attachment.filename))
                    .add_file(file),
            )
            .await
            .map_err(map_error)?;

        let stored = message
            .attachments
            .first()
            .ok_or(UploadError::MissingAttachment)?;

        debug!(
            owner = %owner,
            channel = %channel,
            message_id = %message.id,
            "Attachment re-hosted"
        );

        Ok(UploadedImage {
            url: stored.url.clone(),
            original_name: attachment.filename.clone(),
            size: u64::from(stored.size),
            message_id: message.id.get(),
        })
    }

    async fn backup_profile(&self, backup: &ProfileBackup) -> Result<(), UploadError> {
        let channel = self.channel()?;
        let content = backup_content(backup)?;
        channel
            .send_message(&self.http, CreateMessage::new().content(content))
            .await
            .map_err(map_error)?;
        Ok(())
    }
}
