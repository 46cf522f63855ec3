//! Embeds and buttons for gallery pages.

use serenity::all::{
    ButtonStyle, CreateActionRow, CreateAttachment, CreateButton, CreateEmbed, CreateEmbedFooter,
    ReactionType, Timestamp,
};

use crate::application::dto::{EmptyProfile, GalleryPage};
use crate::application::services::{CustomId, Direction};
use crate::domain::entities::{PassThroughReason, Quote, RenderResult, UserId};

use super::locale::{GalleryText, Locale};

/// Embed accent color.
pub const ACCENT_COLOR: u32 = 0xE1_30_6C;

/// File name of the attached card; embeds reference it as `attachment://`.
pub const CARD_FILENAME: &str = "profile_card.png";

/// Everything that varies per viewer rather than per page.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub locale: Locale,
    /// User allowed to press the buttons.
    pub requester: UserId,
    pub owner_avatar_url: &'a str,
    pub support_url: Option<&'a str>,
}

/// Plain description of a button, before it becomes a platform builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: &'static str,
    pub emoji: &'static str,
    pub style: ButtonStyle,
    pub disabled: bool,
    pub target: ButtonTarget,
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    Custom(String),
    Link(String),
}

impl ButtonSpec {
    fn build(&self) -> CreateButton {
        let button = match &self.target {
            ButtonTarget::Custom(id) => CreateButton::new(id).style(self.style),
            ButtonTarget::Link(url) => CreateButton::new_link(url),
        };
        button
            .label(self.label)
            .emoji(ReactionType::Unicode(self.emoji.to_string()))
            .disabled(self.disabled)
    }
}

/// A gallery page ready to send.
pub struct GalleryMessage {
    pub embed: CreateEmbed,
    pub components: Vec<CreateActionRow>,
    /// Rendered card, when one was produced.
    pub card: Option<CreateAttachment>,
    /// Text-only fallback with the raw image link.
    pub summary: String,
}

/// Buttons for `page`: pagination when there is more than one image,
/// then like, comment and the optional support link.
#[must_use]
pub fn page_buttons(page: &GalleryPage, ctx: &ViewContext<'_>) -> Vec<ButtonSpec> {
    let text = GalleryText::new(ctx.locale);
    let mut buttons = Vec::with_capacity(5);

    if page.total > 1 {
        for (direction, label, emoji, disabled) in [
            (Direction::Previous, text.previous(), "⬅️", !page.has_previous()),
            (Direction::Next, text.next(), "➡️", !page.has_next()),
        ] {
            let id = CustomId::Navigate {
                direction,
                owner: page.owner,
                index: page.index,
                requester: ctx.requester,
            };
            buttons.push(ButtonSpec {
                label,
                emoji,
                style: ButtonStyle::Secondary,
                disabled,
                target: ButtonTarget::Custom(id.to_string()),
            });
        }
    }

    buttons.push(ButtonSpec {
        label: text.like(page.viewer_liked),
        emoji: "❤️",
        style: if page.viewer_liked {
            ButtonStyle::Danger
        } else {
            ButtonStyle::Primary
        },
        disabled: false,
        target: ButtonTarget::Custom(
            CustomId::Like {
                image: page.image.id,
                requester: ctx.requester,
            }
            .to_string(),
        ),
    });

    buttons.push(ButtonSpec {
        label: text.comment(),
        emoji: "💬",
        style: ButtonStyle::Secondary,
        disabled: false,
        target: ButtonTarget::Custom(
            CustomId::Comment {
                image: page.image.id,
                requester: ctx.requester,
            }
            .to_string(),
        ),
    });

    if let Some(url) = ctx.support_url {
        buttons.push(ButtonSpec {
            label: text.support(),
            emoji: "💖",
            style: ButtonStyle::Secondary,
            disabled: false,
            target: ButtonTarget::Link(url.to_string()),
        });
    }

    buttons
}

fn numbered_quotes(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. \"{}\"", i + 1, q.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Embed description: a notice for pass-through images, then quotes,
/// then the latest comments.
#[must_use]
pub fn page_description(page: &GalleryPage, locale: Locale) -> String {
    let text = GalleryText::new(locale);
    let mut sections = Vec::new();

    let notice = match &page.render {
        Some(RenderResult::Bitmap(_)) => None,
        Some(RenderResult::PassThrough { reason, .. }) => Some(match reason {
            PassThroughReason::Animated => text.animated_notice(),
            PassThroughReason::ProcessingFailed => text.fallback_notice(),
        }),
        None => page.is_animated.then(|| text.animated_notice()),
    };
    if let Some(notice) = notice {
        sections.push(notice.to_string());
    }

    if !page.quotes.is_empty() {
        sections.push(format!("{}\n{}", text.quotes_heading(), numbered_quotes(&page.quotes)));
    }

    if !page.comments.is_empty() {
        let lines = page
            .comments
            .iter()
            .map(|c| format!("<@{}>: {}", c.author, c.text))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("{}\n{lines}", text.comments_heading()));
    }

    sections.join("\n\n")
}

/// Builds the full message for a gallery page.
#[must_use]
pub fn gallery_message(page: &GalleryPage, ctx: &ViewContext<'_>) -> GalleryMessage {
    let text = GalleryText::new(ctx.locale);
    let footer = text.footer(page.position(), page.total, page.image.like_count);

    let mut embed = CreateEmbed::new()
        .color(ACCENT_COLOR)
        .title(text.title(&page.title_name))
        .footer(CreateEmbedFooter::new(&footer).icon_url(ctx.owner_avatar_url))
        .timestamp(Timestamp::now());

    let description = page_description(page, ctx.locale);
    if !description.is_empty() {
        embed = embed.description(description);
    }

    let card = match &page.render {
        Some(RenderResult::Bitmap(png)) => {
            embed = embed.image(format!("attachment://{CARD_FILENAME}"));
            Some(CreateAttachment::bytes(png.to_vec(), CARD_FILENAME))
        }
        Some(RenderResult::PassThrough { original_url, .. }) => {
            embed = embed.image(original_url);
            None
        }
        None => {
            embed = embed.image(&page.image.url);
            None
        }
    };

    let buttons = page_buttons(page, ctx)
        .iter()
        .map(ButtonSpec::build)
        .collect();

    let summary = format!(
        "📸 **{}**\n**{footer}**\n\n{}",
        text.title(&page.title_name),
        page.image.url
    );

    GalleryMessage {
        embed,
        components: vec![CreateActionRow::Buttons(buttons)],
        card,
        summary,
    }
}

/// Embed for a profile without images.
#[must_use]
pub fn empty_profile_embed(
    profile: &EmptyProfile,
    own: bool,
    display_name: &str,
    avatar_url: &str,
    locale: Locale,
) -> CreateEmbed {
    let text = GalleryText::new(locale);
    let mut embed = CreateEmbed::new()
        .color(ACCENT_COLOR)
        .title(text.empty_title())
        .description(text.empty_description(own, display_name))
        .thumbnail(avatar_url)
        .field(
            text.username_field(),
            profile.username.as_deref().unwrap_or(text.not_set()),
            true,
        )
        .field(
            text.images_field(),
            format!("0/{}", profile.max_images),
            true,
        )
        .timestamp(Timestamp::now());

    if !profile.quotes.is_empty() {
        embed = embed.field(text.quotes_heading(), numbered_quotes(&profile.quotes), false);
    }
    embed
}
