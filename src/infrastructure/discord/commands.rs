//! Slash command registration and handling.

use serenity::all::{
    Attachment, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditAttachments, EditInteractionResponse, ResolvedOption, ResolvedValue, User,
};
use tracing::{debug, info, warn};

use crate::application::dto::{GalleryQuery, GalleryView};
use crate::domain::entities::{AttachmentInfo, Caller};
use crate::domain::errors::{AttachmentRule, ProfileError};
use crate::presentation::embeds::help_embed;
use crate::presentation::gallery_view::{empty_profile_embed, gallery_message};
use crate::presentation::{Locale, ViewContext};

use super::bot::{
    CARD_AVATAR_SIZE, FOOTER_AVATAR_SIZE, ProfileBot, avatar_url, user_id,
};
use super::{log_response_error, log_send_error};

const LOCALE: Locale = Locale::English;

fn position_option(name: &'static str, description: &'static str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, name, description)
        .required(true)
        .min_int_value(1)
}

/// Every slash command the bot registers.
pub(super) fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("profile")
            .description("View a profile gallery")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Whose profile to view",
            )),
        CreateCommand::new("upload")
            .description("Upload an image to your gallery")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Attachment, "image", "Image to upload")
                    .required(true),
            ),
        CreateCommand::new("deleteimage")
            .description("Delete an image from your gallery")
            .add_option(position_option("position", "Image position")),
        CreateCommand::new("reorder")
            .description("Move an image to another position")
            .add_option(position_option("from", "Current position"))
            .add_option(position_option("to", "New position")),
        CreateCommand::new("addquote")
            .description("Add a quote to your profile")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "quote", "Quote text")
                    .required(true),
            ),
        CreateCommand::new("deletequote")
            .description("Delete a quote from your profile")
            .add_option(position_option("position", "Quote position")),
        CreateCommand::new("reorderquote")
            .description("Move a quote to another position")
            .add_option(position_option("from", "Current position"))
            .add_option(position_option("to", "New position")),
        CreateCommand::new("setusername")
            .description("Set the name shown on your gallery")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "username", "New username")
                    .required(true),
            ),
        CreateCommand::new("help").description("Show available commands"),
    ]
}

/// Typed access to resolved command options.
struct Options<'a>(Vec<ResolvedOption<'a>>);

impl<'a> Options<'a> {
    fn value(&self, name: &str) -> Option<&ResolvedValue<'a>> {
        self.0.iter().find(|o| o.name == name).map(|o| &o.value)
    }

    /// Positions arrive as integers; anything unusable maps to 0, which
    /// every position check rejects.
    fn position(&self, name: &str) -> usize {
        match self.value(name) {
            Some(ResolvedValue::Integer(v)) => usize::try_from(*v).unwrap_or(0),
            _ => 0,
        }
    }

    fn string(&self, name: &str) -> &'a str {
        match self.value(name) {
            Some(ResolvedValue::String(s)) => *s,
            _ => "",
        }
    }

    fn user(&self, name: &str) -> Option<&'a User> {
        match self.value(name) {
            Some(ResolvedValue::User(user, _)) => Some(*user),
            _ => None,
        }
    }

    fn attachment(&self, name: &str) -> Option<&'a Attachment> {
        match self.value(name) {
            Some(ResolvedValue::Attachment(attachment)) => Some(*attachment),
            _ => None,
        }
    }
}

pub(super) fn attachment_info(attachment: &Attachment) -> AttachmentInfo {
    AttachmentInfo {
        filename: attachment.filename.clone(),
        url: attachment.url.clone(),
        size: u64::from(attachment.size),
        content_type: attachment.content_type.clone(),
    }
}

fn reply(content: String, ephemeral: bool) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(ephemeral),
    )
}

fn outcome<T>(
    result: Result<T, ProfileError>,
    success: impl FnOnce(T) -> String,
) -> CreateInteractionResponse {
    match result {
        Ok(value) => reply(success(value), false),
        Err(e) => {
            debug!(error = %e, "Command refused");
            reply(LOCALE.error(&e), true)
        }
    }
}

impl ProfileBot {
    pub(super) async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let name = command.data.name.as_str();
        let author = user_id(&command.user);
        let roles = command
            .member
            .as_ref()
            .map_or(&[][..], |member| member.roles.as_slice());
        let caller = self.caller(author, roles);
        let options = Options(command.data.options());

        info!(command = name, user = %author, "Slash command");

        let response = match name {
            "profile" => {
                let target = options.user("user").unwrap_or(&command.user);
                self.show_profile(ctx, command, target).await;
                return;
            }
            "upload" => {
                match options.attachment("image") {
                    Some(attachment) => {
                        self.upload(ctx, command, &caller, attachment).await;
                        return;
                    }
                    None => reply(
                        LOCALE.error(&ProfileError::InvalidAttachment(AttachmentRule::Incomplete)),
                        true,
                    ),
                }
            }
            "deleteimage" => {
                let position = options.position("position");
                outcome(self.images.delete(&caller, position).await, |()| {
                    LOCALE.image_deleted(position)
                })
            }
            "reorder" => {
                let (from, to) = (options.position("from"), options.position("to"));
                outcome(self.images.reorder(&caller, from, to).await, |()| {
                    LOCALE.images_reordered(from, to)
                })
            }
            "addquote" => outcome(
                self.quotes.add(&caller, options.string("quote"), false).await,
                |added| LOCALE.quote_added(added.count, added.max),
            ),
            "deletequote" => {
                let position = options.position("position");
                outcome(self.quotes.delete(&caller, position).await, |()| {
                    LOCALE.quote_deleted(position)
                })
            }
            "reorderquote" => {
                let (from, to) = (options.position("from"), options.position("to"));
                outcome(self.quotes.reorder(&caller, from, to).await, |()| {
                    LOCALE.quotes_reordered(from, to)
                })
            }
            "setusername" => outcome(
                self.username.execute(&caller, options.string("username")).await,
                |username| LOCALE.username_set(&username),
            ),
            "help" => CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().embed(help_embed(&self.limits)),
            ),
            other => {
                warn!(command = other, "Unknown slash command");
                return;
            }
        };

        log_response_error(command.create_response(&ctx.http, response).await);
    }

    async fn show_profile(&self, ctx: &Context, command: &CommandInteraction, target: &User) {
        if let Err(e) = command.defer(&ctx.http).await {
            log_send_error(&e);
            return;
        }

        let query = GalleryQuery {
            owner: user_id(target),
            owner_display_name: target.display_name().to_string(),
            owner_avatar_url: avatar_url(target, CARD_AVATAR_SIZE),
            viewer: user_id(&command.user),
            index: 0,
            render_card: true,
        };

        let edit = match self.gallery.page(&query).await {
            Ok(GalleryView::Empty(profile)) => EditInteractionResponse::new().embed(
                empty_profile_embed(
                    &profile,
                    target.id == command.user.id,
                    target.display_name(),
                    &avatar_url(target, CARD_AVATAR_SIZE),
                    LOCALE,
                ),
            ),
            Ok(GalleryView::Page(page)) => {
                let footer_avatar = avatar_url(target, FOOTER_AVATAR_SIZE);
                let message = gallery_message(
                    &page,
                    &ViewContext {
                        locale: LOCALE,
                        requester: query.viewer,
                        owner_avatar_url: &footer_avatar,
                        support_url: self.discord.support_url.as_deref(),
                    },
                );
                let attachments = message
                    .card
                    .into_iter()
                    .fold(EditAttachments::new(), EditAttachments::add);
                EditInteractionResponse::new()
                    .embed(message.embed)
                    .components(message.components)
                    .attachments(attachments)
            }
            Err(e) => {
                warn!(owner = %query.owner, error = %e, "Failed to load gallery");
                EditInteractionResponse::new().content(LOCALE.error(&e))
            }
        };

        log_response_error(command.edit_response(&ctx.http, edit).await);
    }

    async fn upload(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        caller: &Caller,
        attachment: &Attachment,
    ) {
        if let Err(e) = command.defer(&ctx.http).await {
            log_send_error(&e);
            return;
        }

        let content = match self.images.upload(caller, &attachment_info(attachment)).await {
            Ok(done) => LOCALE.upload_done(done.count, done.max),
            Err(e) => LOCALE.error(&e),
        };

        log_response_error(
            command
                .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
                .await,
        );
    }
}
