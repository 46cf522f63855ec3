//! Button presses and modal submissions on gallery messages.

use serenity::all::{
    ActionRowComponent, ComponentInteraction, Context, CreateActionRow, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, InputTextStyle,
    ModalInteraction, User,
};
use tracing::{debug, info, warn};

use crate::application::dto::{GalleryQuery, GalleryView};
use crate::application::services::{COMMENT_INPUT_ID, CustomId, Direction};
use crate::domain::entities::{ImageId, UserId};
use crate::domain::errors::ProfileError;
use crate::presentation::embeds::like_notification_embed;
use crate::presentation::locale::GalleryText;
use crate::presentation::{Locale, ViewContext, gallery_message};

use super::bot::{CARD_AVATAR_SIZE, FOOTER_AVATAR_SIZE, ProfileBot, avatar_url, handle, user_id};
use super::delivery::update_gallery;
use super::{log_response_error, log_send_error};

const LOCALE: Locale = Locale::English;

fn ephemeral(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

fn ephemeral_followup(content: impl Into<String>) -> CreateInteractionResponseFollowup {
    CreateInteractionResponseFollowup::new()
        .content(content)
        .ephemeral(true)
}

/// Value of the comment text input.
fn submitted_comment(modal: &ModalInteraction) -> Option<&str> {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == COMMENT_INPUT_ID => {
                input.value.as_deref()
            }
            _ => None,
        })
}

impl ProfileBot {
    pub(super) async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let user = user_id(&component.user);

        if !self.rate_limiter.check(user) {
            log_response_error(
                component
                    .create_response(&ctx.http, ephemeral(LOCALE.rate_limited()))
                    .await,
            );
            return;
        }

        let Some(id) = CustomId::parse(&component.data.custom_id) else {
            warn!(custom_id = %component.data.custom_id, user = %user, "Unknown button action");
            log_response_error(
                component
                    .create_response(&ctx.http, ephemeral(LOCALE.unknown_action()))
                    .await,
            );
            return;
        };

        if id.requester() != Some(user) {
            log_response_error(
                component
                    .create_response(&ctx.http, ephemeral(LOCALE.not_requester()))
                    .await,
            );
            return;
        }

        match id {
            CustomId::Navigate {
                direction,
                owner,
                index,
                ..
            } => self.navigate(ctx, component, direction, owner, index).await,
            CustomId::Like { image, .. } => self.like(ctx, component, image).await,
            CustomId::Comment { image, .. } => self.open_comment_modal(ctx, component, image).await,
            CustomId::CommentModal { .. } => {
                debug!("Modal id on a component, ignoring");
            }
        }
    }

    pub(super) async fn handle_modal(&self, ctx: &Context, modal: &ModalInteraction) {
        let user = user_id(&modal.user);

        if !self.rate_limiter.check(user) {
            log_response_error(
                modal
                    .create_response(&ctx.http, ephemeral(LOCALE.rate_limited()))
                    .await,
            );
            return;
        }

        let Some(CustomId::CommentModal { image }) = CustomId::parse(&modal.data.custom_id) else {
            debug!(custom_id = %modal.data.custom_id, "Unrecognized modal");
            return;
        };

        let text = submitted_comment(modal).unwrap_or_default();
        let content = match self.engagement.comment(image, user, text).await {
            Ok(comment) => {
                info!(image = %image, comment = %comment.id.0, "Comment stored");
                LOCALE.comment_saved().to_string()
            }
            Err(e) => LOCALE.error(&e),
        };

        log_response_error(modal.create_response(&ctx.http, ephemeral(content)).await);
    }

    /// Fetches the owner's profile from Discord; sends a user-facing error on failure.
    async fn owner_profile(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        owner: UserId,
    ) -> Option<User> {
        match serenity::all::UserId::new(owner.0).to_user(ctx).await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(owner = %owner, error = %e, "Could not fetch gallery owner");
                log_response_error(
                    component
                        .create_followup(&ctx.http, ephemeral_followup(LOCALE.user_not_found()))
                        .await,
                );
                None
            }
        }
    }

    /// Loads and shows the page at `index` of `owner`'s gallery.
    async fn show_page(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        owner: &User,
        index: usize,
        render_card: bool,
    ) {
        let query = GalleryQuery {
            owner: user_id(owner),
            owner_display_name: owner.display_name().to_string(),
            owner_avatar_url: avatar_url(owner, CARD_AVATAR_SIZE),
            viewer: user_id(&component.user),
            index,
            render_card,
        };

        let page = match self.gallery.page(&query).await {
            Ok(GalleryView::Page(page)) => page,
            Ok(GalleryView::Empty(_)) => {
                self.followup_error(ctx, component, &ProfileError::NoImages).await;
                return;
            }
            Err(ProfileError::PositionOutOfRange { .. }) => {
                log_response_error(
                    component
                        .create_followup(&ctx.http, ephemeral_followup(LOCALE.invalid_navigation()))
                        .await,
                );
                return;
            }
            Err(e) => {
                warn!(owner = %query.owner, index, error = %e, "Failed to load gallery page");
                self.followup_error(ctx, component, &e).await;
                return;
            }
        };

        let footer_avatar = avatar_url(owner, FOOTER_AVATAR_SIZE);
        let message = gallery_message(
            &page,
            &ViewContext {
                locale: LOCALE,
                requester: query.viewer,
                owner_avatar_url: &footer_avatar,
                support_url: self.discord.support_url.as_deref(),
            },
        );

        update_gallery(ctx, component, &message, &self.gallery_config.delivery_steps).await;
    }

    async fn followup_error(&self, ctx: &Context, component: &ComponentInteraction, err: &ProfileError) {
        log_response_error(
            component
                .create_followup(&ctx.http, ephemeral_followup(LOCALE.error(err)))
                .await,
        );
    }

    async fn navigate(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        direction: Direction,
        owner: UserId,
        index: usize,
    ) {
        if let Err(e) = component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            log_send_error(&e);
            return;
        }

        let Some(target) = direction.apply(index) else {
            log_response_error(
                component
                    .create_followup(&ctx.http, ephemeral_followup(LOCALE.invalid_navigation()))
                    .await,
            );
            return;
        };

        let Some(owner) = self.owner_profile(ctx, component, owner).await else {
            return;
        };

        debug!(owner = %owner.id, from = index, to = target, "Gallery navigation");
        self.show_page(
            ctx,
            component,
            &owner,
            target,
            self.gallery_config.render_cards_on_navigation,
        )
        .await;
    }

    async fn like(&self, ctx: &Context, component: &ComponentInteraction, image: ImageId) {
        if let Err(e) = component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            log_send_error(&e);
            return;
        }

        let user = user_id(&component.user);
        let outcome = match self.engagement.toggle_like(image, user).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.followup_error(ctx, component, &e).await;
                return;
            }
        };

        let Some(owner) = self.owner_profile(ctx, component, outcome.image.owner).await else {
            return;
        };

        if outcome.notify_owner {
            self.notify_like(ctx, &owner, &component.user, &outcome.image.url)
                .await;
        }

        self.show_page(ctx, component, &owner, outcome.index, true)
            .await;
    }

    /// Best effort; owners with closed DMs are skipped.
    async fn notify_like(&self, ctx: &Context, owner: &User, liker: &User, image_url: &str) {
        let embed = like_notification_embed(
            liker.display_name(),
            handle(liker),
            &avatar_url(liker, CARD_AVATAR_SIZE),
            image_url,
        );
        match owner
            .direct_message(ctx, CreateMessage::new().embed(embed))
            .await
        {
            Ok(_) => debug!(owner = %owner.id, liker = %liker.id, "Like notification sent"),
            Err(e) => debug!(owner = %owner.id, error = %e, "Like notification not delivered"),
        }
    }

    async fn open_comment_modal(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        image: ImageId,
    ) {
        if let Err(e) = self.engagement.ensure_commentable(image).await {
            log_response_error(
                component
                    .create_response(&ctx.http, ephemeral(LOCALE.error(&e)))
                    .await,
            );
            return;
        }

        let text = GalleryText::new(LOCALE);
        let max_length = u16::try_from(self.limits.max_comment_length).unwrap_or(u16::MAX);
        let input = CreateInputText::new(
            InputTextStyle::Paragraph,
            text.comment_input_label(),
            COMMENT_INPUT_ID,
        )
        .min_length(1)
        .max_length(max_length)
        .required(true);

        let modal = CreateModal::new(
            CustomId::CommentModal { image }.to_string(),
            text.comment_modal_title(),
        )
        .components(vec![CreateActionRow::InputText(input)]);

        log_response_error(
            component
                .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
                .await,
        );
    }
}
