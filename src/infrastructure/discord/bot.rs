//! Gateway event handler and the services it dispatches to.

use std::sync::Arc;

use serenity::all::{
    Command, Context, EventHandler, Interaction, Message, Ready, RoleId, User,
};
use serenity::async_trait;
use tracing::{debug, error, info};

use crate::application::services::{GalleryService, PrivilegeRegistry, RateLimiter};
use crate::application::use_cases::{
    AdminUseCase, EngagementUseCase, ImagesUseCase, QuotesUseCase, SetUsernameUseCase,
};
use crate::domain::entities::{Caller, CallerFlags, UserId};
use crate::domain::ports::{CardRenderPort, ProfileStorePort, UploadSinkPort};
use crate::infrastructure::config::{AppConfig, DiscordConfig, GalleryConfig, LimitsConfig};
use crate::infrastructure::image::discord_cdn::static_avatar_url;

use super::commands;

/// Avatar size passed to the card renderer.
pub(super) const CARD_AVATAR_SIZE: u32 = 256;

/// Avatar size of embed footers.
pub(super) const FOOTER_AVATAR_SIZE: u32 = 32;

/// Discord event handler for the profile bot.
pub struct ProfileBot {
    pub(super) gallery: GalleryService,
    pub(super) images: ImagesUseCase,
    pub(super) quotes: QuotesUseCase,
    pub(super) username: SetUsernameUseCase,
    pub(super) engagement: EngagementUseCase,
    pub(super) admin: AdminUseCase,
    pub(super) privileges: Arc<PrivilegeRegistry>,
    pub(super) rate_limiter: Arc<RateLimiter>,
    pub(super) discord: DiscordConfig,
    pub(super) gallery_config: GalleryConfig,
    pub(super) limits: LimitsConfig,
}

impl ProfileBot {
    /// Wires the use cases to the given adapters.
    #[must_use]
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn ProfileStorePort>,
        renderer: Arc<dyn CardRenderPort>,
        sink: Arc<dyn UploadSinkPort>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        let limits = config.limits.clone();
        let privileges = Arc::new(PrivilegeRegistry::new(config.discord.admins()));

        Self {
            gallery: GalleryService::new(Arc::clone(&store), renderer, &limits),
            images: ImagesUseCase::new(Arc::clone(&store), Arc::clone(&sink), limits.clone()),
            quotes: QuotesUseCase::new(Arc::clone(&store), Arc::clone(&sink), limits.clone()),
            username: SetUsernameUseCase::new(Arc::clone(&store), sink, limits.clone()),
            engagement: EngagementUseCase::new(Arc::clone(&store), limits.max_comment_length),
            admin: AdminUseCase::new(store, Arc::clone(&privileges)),
            privileges,
            rate_limiter,
            discord: config.discord.clone(),
            gallery_config: config.gallery.clone(),
            limits,
        }
    }

    /// Resolves what `user` may do from config, roles and granted privileges.
    pub(super) fn caller(&self, user: UserId, roles: &[RoleId]) -> Caller {
        Caller::new(
            user,
            caller_flags(
                user,
                roles,
                self.discord.allowed_role_id,
                &self.privileges,
            ),
        )
    }
}

pub(super) fn caller_flags(
    user: UserId,
    roles: &[RoleId],
    allowed_role: Option<u64>,
    privileges: &PrivilegeRegistry,
) -> CallerFlags {
    let mut flags = CallerFlags::empty();
    if privileges.is_admin(user) {
        flags |= CallerFlags::ADMIN;
    }
    if allowed_role.is_some_and(|role| roles.iter().any(|r| r.get() == role)) {
        flags |= CallerFlags::ALLOWED_ROLE;
    }
    if privileges.is_privileged(user) {
        flags |= CallerFlags::USERNAME_PRIVILEGE;
    }
    flags
}

/// Domain id of a platform user.
pub(super) fn user_id(user: &User) -> UserId {
    UserId(user.id.get())
}

/// Static avatar URL at `size` pixels.
pub(super) fn avatar_url(user: &User, size: u32) -> String {
    static_avatar_url(&user.face(), size)
}

/// Handle shown to other users.
pub(super) fn handle(user: &User) -> &str {
    &user.name
}

#[async_trait]
impl EventHandler for ProfileBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Discord bot connected"
        );

        match Command::set_global_commands(&ctx.http, commands::definitions()).await {
            Ok(registered) => info!(count = registered.len(), "Slash commands registered"),
            Err(e) => error!(error = %e, "Failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.handle_command(&ctx, &command).await,
            Interaction::Component(component) => self.handle_component(&ctx, &component).await,
            Interaction::Modal(modal) => self.handle_modal(&ctx, &modal).await,
            other => debug!(kind = ?other.kind(), "Ignoring interaction"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !self.discord.text_commands {
            return;
        }
        self.handle_text(&ctx, &msg).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLE: u64 = 900;

    #[test]
    fn test_caller_flags() {
        let registry = PrivilegeRegistry::new([UserId(1)]);

        let admin = caller_flags(UserId(1), &[], Some(ROLE), &registry);
        assert!(admin.contains(CallerFlags::ADMIN | CallerFlags::USERNAME_PRIVILEGE));
        assert!(!admin.contains(CallerFlags::ALLOWED_ROLE));

        let member = caller_flags(UserId(2), &[RoleId::new(ROLE)], Some(ROLE), &registry);
        assert_eq!(member, CallerFlags::ALLOWED_ROLE);

        let stranger = caller_flags(UserId(3), &[RoleId::new(5)], Some(ROLE), &registry);
        assert_eq!(stranger, CallerFlags::empty());

        registry.toggle(UserId(3));
        let granted = caller_flags(UserId(3), &[], None, &registry);
        assert_eq!(granted, CallerFlags::USERNAME_PRIVILEGE);
    }
}
