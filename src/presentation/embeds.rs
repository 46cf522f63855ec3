//! Standalone embeds: help, admin results and like notifications.

use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp};

use crate::application::dto::ResetOutcome;
use crate::application::services::PrivilegeChange;
use crate::domain::entities::UserId;
use crate::infrastructure::config::LimitsConfig;

use super::gallery_view::ACCENT_COLOR;
use super::locale::Locale;

const RESET_COLOR: u32 = 0xFF_00_00;
const GRANTED_COLOR: u32 = 0x00_FF_00;
const REVOKED_COLOR: u32 = 0xFF_44_44;

/// `/help` listing every slash command.
#[must_use]
pub fn help_embed(limits: &LimitsConfig) -> CreateEmbed {
    let commands = [
        ("/profile [user]", "View a gallery, yours by default".to_string()),
        (
            "/upload <image>",
            format!("Add an image (max {})", limits.max_images),
        ),
        ("/deleteimage <position>", "Remove an image".to_string()),
        ("/reorder <from> <to>", "Move an image".to_string()),
        (
            "/addquote <quote>",
            format!(
                "Add a quote (max {}, up to {} characters)",
                limits.max_quotes, limits.max_quote_length
            ),
        ),
        ("/deletequote <position>", "Remove a quote".to_string()),
        ("/reorderquote <from> <to>", "Move a quote".to_string()),
        (
            "/setusername <username>",
            format!(
                "Set your display username ({}-{} letters)",
                limits.min_username_length, limits.max_username_length
            ),
        ),
    ];

    commands.into_iter().fold(
        CreateEmbed::new()
            .color(ACCENT_COLOR)
            .title("📸 Profile Bot Commands")
            .description("Build an Instagram-style profile with images and quotes.")
            .footer(CreateEmbedFooter::new(
                "Use the buttons under a gallery to browse, like and comment.",
            )),
        |embed, (name, value)| embed.field(name, value, false),
    )
}

/// Result of the reset-user text command.
#[must_use]
pub fn reset_embed(target: UserId, outcome: &ResetOutcome) -> CreateEmbed {
    CreateEmbed::new()
        .color(RESET_COLOR)
        .title("🗑️ تم مسح بيانات المستخدم")
        .description(format!("<@{target}>"))
        .field("📷 الصور المحذوفة", outcome.images.to_string(), true)
        .field("💬 النبذات المحذوفة", outcome.quotes.to_string(), true)
        .field(
            "👤 اسم المستخدم",
            if outcome.had_username {
                "تم إزالته"
            } else {
                "لم يكن محدد"
            },
            true,
        )
        .timestamp(Timestamp::now())
}

/// Result of granting or revoking the username privilege.
#[must_use]
pub fn privilege_embed(target: UserId, change: PrivilegeChange) -> CreateEmbed {
    let (color, description) = match change {
        PrivilegeChange::Granted => (
            GRANTED_COLOR,
            format!("<@{target}> يمكنه الآن استخدام أي اسم مستخدم"),
        ),
        PrivilegeChange::Revoked => (
            REVOKED_COLOR,
            format!("<@{target}> يخضع الآن لقواعد اسم المستخدم العادية"),
        ),
    };
    CreateEmbed::new()
        .color(color)
        .title(Locale::privilege_title(change))
        .description(description)
        .timestamp(Timestamp::now())
}

/// Users with relaxed username rules.
#[must_use]
pub fn privileged_list_embed(users: &[UserId]) -> CreateEmbed {
    let body = if users.is_empty() {
        "لا يوجد مستخدمون".to_string()
    } else {
        users
            .iter()
            .enumerate()
            .map(|(i, user)| format!("{}. <@{user}>", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };
    CreateEmbed::new()
        .color(ACCENT_COLOR)
        .title("👑 المستخدمون المميزون")
        .description(body)
}

/// Direct message telling an owner someone liked their image.
#[must_use]
pub fn like_notification_embed(
    liker_display_name: &str,
    liker_username: &str,
    liker_avatar_url: &str,
    image_url: &str,
) -> CreateEmbed {
    CreateEmbed::new()
        .color(ACCENT_COLOR)
        .title("💖 Someone liked your image!")
        .description(format!(
            "**{liker_display_name}** (@{liker_username}) liked your image!"
        ))
        .image(image_url)
        .thumbnail(liker_avatar_url)
        .timestamp(Timestamp::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn json(embed: &CreateEmbed) -> Value {
        serde_json::to_value(embed).unwrap()
    }

    #[test]
    fn test_help_lists_commands() {
        let value = json(&help_embed(&LimitsConfig::default()));
        let fields = value["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[1]["value"], "Add an image (max 3)");
        assert_eq!(fields[7]["value"], "Set your display username (2-20 letters)");
    }

    #[test]
    fn test_reset_fields() {
        let outcome = ResetOutcome {
            images: 2,
            quotes: 0,
            had_username: false,
        };
        let value = json(&reset_embed(UserId(5), &outcome));
        assert_eq!(value["color"], 0xFF_00_00);
        assert_eq!(value["description"], "<@5>");
        assert_eq!(value["fields"][0]["value"], "2");
        assert_eq!(value["fields"][2]["value"], "لم يكن محدد");
    }

    #[test]
    fn test_privilege_colors() {
        assert_eq!(
            json(&privilege_embed(UserId(1), PrivilegeChange::Granted))["color"],
            0x00_FF_00
        );
        assert_eq!(
            json(&privilege_embed(UserId(1), PrivilegeChange::Revoked))["color"],
            0xFF_44_44
        );
    }

    #[test]
    fn test_privileged_list() {
        let value = json(&privileged_list_embed(&[UserId(1), UserId(9)]));
        assert_eq!(value["description"], "1. <@1>\n2. <@9>");
        assert_eq!(
            json(&privileged_list_embed(&[]))["description"],
            "لا يوجد مستخدمون"
        );
    }

    #[test]
    fn test_like_notification() {
        let value = json(&like_notification_embed(
            "Bob",
            "bob",
            "https://x/avatar.png",
            "https://x/img.png",
        ));
        assert_eq!(value["description"], "**Bob** (@bob) liked your image!");
        assert_eq!(value["image"]["url"], "https://x/img.png");
    }
}
