//! Arabic `!` commands sent as plain messages.

use serenity::all::{Context, CreateEmbed, CreateMessage, Message, RoleId, User};
use tracing::{debug, info, warn};

use crate::application::dto::{GalleryQuery, GalleryView};
use crate::application::services::text_commands::{self, GrantTarget, TextCommand};
use crate::domain::entities::{Caller, UserId};
use crate::presentation::embeds::{privilege_embed, privileged_list_embed, reset_embed};
use crate::presentation::gallery_view::empty_profile_embed;
use crate::presentation::{Locale, ViewContext, gallery_message};

use super::bot::{CARD_AVATAR_SIZE, FOOTER_AVATAR_SIZE, ProfileBot, avatar_url, user_id};
use super::log_response_error;

const LOCALE: Locale = Locale::Arabic;

/// What to send back for a text command.
enum Reply {
    Text(String),
    Embed(CreateEmbed),
    Message(CreateMessage),
}

impl ProfileBot {
    pub(super) async fn handle_text(&self, ctx: &Context, msg: &Message) {
        let first_mention = msg.mentions.first().map(user_id);
        let Some(parsed) = text_commands::parse(&msg.content, first_mention) else {
            return;
        };

        let command = match parsed {
            Ok(command) => command,
            Err(kind) => {
                debug!(?kind, user = %msg.author.id, "Malformed text command");
                self.send(ctx, msg, Reply::Text(Locale::usage(kind))).await;
                return;
            }
        };

        let roles: &[RoleId] = msg
            .member
            .as_ref()
            .map_or(&[][..], |member| member.roles.as_slice());
        let caller = self.caller(user_id(&msg.author), roles);

        info!(command = ?command.kind(), user = %caller.id, "Text command");

        let reply = self.run(ctx, msg, &caller, command).await;
        self.send(ctx, msg, reply).await;
    }

    async fn run(&self, ctx: &Context, msg: &Message, caller: &Caller, command: TextCommand) -> Reply {
        let result = match command {
            TextCommand::Profile { target } => return self.profile(ctx, msg, target).await,
            TextCommand::DeleteImage { position } => self
                .images
                .delete(caller, position)
                .await
                .map(|()| Reply::Text(LOCALE.image_deleted(position))),
            TextCommand::Reorder { from, to } => self
                .images
                .reorder(caller, from, to)
                .await
                .map(|()| Reply::Text(LOCALE.images_reordered(from, to))),
            TextCommand::AddQuote { text } => self
                .quotes
                .add(caller, &text, true)
                .await
                .map(|added| Reply::Text(LOCALE.quote_added(added.count, added.max))),
            TextCommand::DeleteQuote { position } => self
                .quotes
                .delete(caller, position)
                .await
                .map(|()| Reply::Text(LOCALE.quote_deleted(position))),
            TextCommand::SetUsername { username } => self
                .username
                .execute(caller, &username)
                .await
                .map(|name| Reply::Text(LOCALE.username_set(&name))),
            TextCommand::ResetUser { target } => self
                .admin
                .reset_user(caller, target)
                .await
                .map(|summary| Reply::Embed(reset_embed(target, &summary))),
            TextCommand::GrantPrivilege {
                target: GrantTarget::List,
            } => self
                .admin
                .privileged_users(caller)
                .map(|users| Reply::Embed(privileged_list_embed(&users))),
            TextCommand::GrantPrivilege {
                target: GrantTarget::User(target),
            } => self
                .admin
                .toggle_privilege(caller, target)
                .map(|change| Reply::Embed(privilege_embed(target, change))),
        };

        result.unwrap_or_else(|e| {
            debug!(user = %caller.id, error = %e, "Text command refused");
            Reply::Text(LOCALE.error(&e))
        })
    }

    async fn resolve_user(&self, ctx: &Context, msg: &Message, target: Option<UserId>) -> Option<User> {
        let Some(target) = target else {
            return Some(msg.author.clone());
        };
        if let Some(mentioned) = msg.mentions.iter().find(|u| u.id.get() == target.0) {
            return Some(mentioned.clone());
        }
        match serenity::all::UserId::new(target.0).to_user(ctx).await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(target = %target, error = %e, "Could not fetch profile owner");
                None
            }
        }
    }

    async fn profile(&self, ctx: &Context, msg: &Message, target: Option<UserId>) -> Reply {
        let Some(owner) = self.resolve_user(ctx, msg, target).await else {
            return Reply::Text(LOCALE.user_not_found().to_string());
        };

        let query = GalleryQuery {
            owner: user_id(&owner),
            owner_display_name: owner.display_name().to_string(),
            owner_avatar_url: avatar_url(&owner, CARD_AVATAR_SIZE),
            viewer: user_id(&msg.author),
            index: 0,
            render_card: true,
        };

        match self.gallery.page(&query).await {
            Ok(GalleryView::Empty(profile)) => Reply::Embed(empty_profile_embed(
                &profile,
                owner.id == msg.author.id,
                owner.display_name(),
                &avatar_url(&owner, CARD_AVATAR_SIZE),
                LOCALE,
            )),
            Ok(GalleryView::Page(page)) => {
                let footer_avatar = avatar_url(&owner, FOOTER_AVATAR_SIZE);
                let message = gallery_message(
                    &page,
                    &ViewContext {
                        locale: LOCALE,
                        requester: query.viewer,
                        owner_avatar_url: &footer_avatar,
                        support_url: self.discord.support_url.as_deref(),
                    },
                );
                Reply::Message(
                    CreateMessage::new()
                        .embed(message.embed)
                        .components(message.components)
                        .add_files(message.card),
                )
            }
            Err(e) => {
                warn!(owner = %query.owner, error = %e, "Failed to load gallery");
                Reply::Text(LOCALE.error(&e))
            }
        }
    }

    async fn send(&self, ctx: &Context, msg: &Message, reply: Reply) {
        let message = match reply {
            Reply::Text(text) => CreateMessage::new().content(text),
            Reply::Embed(embed) => CreateMessage::new().embed(embed),
            Reply::Message(message) => message,
        };
        log_response_error(
            msg.channel_id
                .send_message(&ctx.http, message.reference_message(msg))
                .await,
        );
    }
}
