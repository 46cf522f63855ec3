//! Updating a gallery message after a button press.

use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponseFollowup, CreateMessage,
    EditAttachments, EditInteractionResponse,
};
use tracing::{debug, error};

use crate::application::services::deliver;
use crate::infrastructure::config::DeliveryStep;
use crate::presentation::GalleryMessage;

async fn attempt(
    ctx: &Context,
    component: &ComponentInteraction,
    message: &GalleryMessage,
    step: DeliveryStep,
) -> serenity::Result<()> {
    match step {
        DeliveryStep::EditOriginal => {
            let attachments = message
                .card
                .iter()
                .cloned()
                .fold(EditAttachments::new(), EditAttachments::add);
            let edit = EditInteractionResponse::new()
                .embed(message.embed.clone())
                .components(message.components.clone())
                .attachments(attachments);
            component.edit_response(&ctx.http, edit).await?;
        }
        DeliveryStep::FollowUpEmbed => {
            let followup = CreateInteractionResponseFollowup::new()
                .embed(message.embed.clone())
                .components(message.components.clone())
                .add_files(message.card.iter().cloned());
            component.create_followup(&ctx.http, followup).await?;
        }
        DeliveryStep::FollowUpText => {
            let followup = CreateInteractionResponseFollowup::new().content(&message.summary);
            component.create_followup(&ctx.http, followup).await?;
        }
        DeliveryStep::ChannelMessage => {
            component
                .channel_id
                .send_message(&ctx.http, CreateMessage::new().content(&message.summary))
                .await?;
        }
    }
    Ok(())
}

/// Shows `message` in place of the pressed gallery, trying `steps` in order.
///
/// The interaction must already be acknowledged.
pub(super) async fn update_gallery(
    ctx: &Context,
    component: &ComponentInteraction,
    message: &GalleryMessage,
    steps: &[DeliveryStep],
) {
    match deliver(steps, |step| attempt(ctx, component, message, step)).await {
        Ok(step) => debug!(?step, message_id = %component.message.id, "Gallery updated"),
        Err(e) => error!(
            error = %e,
            message_id = %component.message.id,
            "Could not update gallery"
        ),
    }
}
