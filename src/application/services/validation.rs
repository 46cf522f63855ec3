//! Input rules shared by slash and text commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::AttachmentInfo;
use crate::domain::errors::{AttachmentRule, ProfileError, UsernameRule};
use crate::infrastructure::config::LimitsConfig;

static LETTERS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>"'&]"#).unwrap());

/// Checks a requested username.
///
/// Regular users are limited to ASCII letters with a minimum length.
/// Relaxed callers may use any text that avoids markup characters.
///
/// # Errors
/// Returns the first rule the username breaks.
pub fn validate_username(
    username: &str,
    relaxed: bool,
    limits: &LimitsConfig,
) -> Result<(), UsernameRule> {
    let length = username.chars().count();

    if length > limits.max_username_length {
        return Err(UsernameRule::TooLong);
    }

    if relaxed {
        if length == 0 {
            return Err(UsernameRule::TooShort);
        }
        if UNSAFE_CHARS.is_match(username) {
            return Err(UsernameRule::UnsafeCharacters);
        }
        return Ok(());
    }

    if length < limits.min_username_length {
        return Err(UsernameRule::TooShort);
    }
    if !LETTERS_ONLY.is_match(username) {
        return Err(UsernameRule::LettersOnly);
    }
    Ok(())
}

/// Checks an attachment before it is re-uploaded.
///
/// Size is checked first, then the content type, then that the
/// platform actually supplied a URL and a name.
///
/// # Errors
/// Returns the first rule the attachment breaks.
pub fn validate_attachment(
    attachment: &AttachmentInfo,
    limits: &LimitsConfig,
) -> Result<(), AttachmentRule> {
    if attachment.size > limits.max_file_size {
        return Err(AttachmentRule::TooLarge {
            max_bytes: limits.max_file_size,
        });
    }

    let allowed = attachment.content_type.as_deref().is_some_and(|ct| {
        let essence = ct.split(';').next().unwrap_or(ct).trim();
        limits
            .allowed_content_types
            .iter()
            .any(|a| a.eq_ignore_ascii_case(essence))
    });
    if !allowed {
        return Err(AttachmentRule::UnsupportedType);
    }

    if attachment.url.trim().is_empty() || attachment.filename.trim().is_empty() {
        return Err(AttachmentRule::Incomplete);
    }
    Ok(())
}

/// Checks a one-based position against a list of `count` items.
///
/// # Errors
/// Returns [`ProfileError::PositionOutOfRange`] outside `1..=count`.
pub const fn validate_position(position: usize, count: usize) -> Result<(), ProfileError> {
    if position == 0 || position > count {
        return Err(ProfileError::PositionOutOfRange { count });
    }
    Ok(())
}

/// Trims free text and checks its length in characters.
///
/// # Errors
/// Returns [`ProfileError::TextLength`] when empty or longer than `max`.
pub fn validate_text(text: &str, max: usize) -> Result<&str, ProfileError> {
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    if length == 0 || length > max {
        return Err(ProfileError::TextLength { max });
    }
    Ok(trimmed)
}

/// Replaces anything outside `[a-zA-Z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn attachment(size: u64, content_type: Option<&str>) -> AttachmentInfo {
        AttachmentInfo {
            filename: "photo.png".to_string(),
            url: "https://cdn.discordapp.com/attachments/1/2/photo.png".to_string(),
            size,
            content_type: content_type.map(str::to_string),
        }
    }

    #[test_case("alice", false => Ok(()) ; "letters")]
    #[test_case("Al", false => Ok(()) ; "minimum length")]
    #[test_case("a", false => Err(UsernameRule::TooShort) ; "too short")]
    #[test_case("alice1", false => Err(UsernameRule::LettersOnly) ; "digit")]
    #[test_case("محمد", false => Err(UsernameRule::LettersOnly) ; "non ascii")]
    #[test_case("abcdefghijklmnopqrstu", false => Err(UsernameRule::TooLong) ; "too long")]
    #[test_case("x", true => Ok(()) ; "relaxed single char")]
    #[test_case("محمد_99", true => Ok(()) ; "relaxed any text")]
    #[test_case("<b>", true => Err(UsernameRule::UnsafeCharacters) ; "relaxed markup")]
    #[test_case("tom&jerry", true => Err(UsernameRule::UnsafeCharacters) ; "relaxed ampersand")]
    #[test_case("", true => Err(UsernameRule::TooShort) ; "relaxed empty")]
    fn test_username(name: &str, relaxed: bool) -> Result<(), UsernameRule> {
        validate_username(name, relaxed, &LimitsConfig::default())
    }

    #[test]
    fn test_attachment_accepts_png() {
        let limits = LimitsConfig::default();
        assert_eq!(validate_attachment(&attachment(1024, Some("image/png")), &limits), Ok(()));
    }

    #[test]
    fn test_attachment_size_checked_before_type() {
        let limits = LimitsConfig::default();
        let result = validate_attachment(&attachment(limits.max_file_size + 1, None), &limits);
        assert_eq!(
            result,
            Err(AttachmentRule::TooLarge {
                max_bytes: limits.max_file_size
            })
        );
    }

    #[test_case(None ; "missing")]
    #[test_case(Some("application/pdf") ; "pdf")]
    #[test_case(Some("image/bmp") ; "bmp")]
    fn test_attachment_rejects_type(content_type: Option<&str>) {
        let limits = LimitsConfig::default();
        assert_eq!(
            validate_attachment(&attachment(10, content_type), &limits),
            Err(AttachmentRule::UnsupportedType)
        );
    }

    #[test]
    fn test_attachment_content_type_parameters_ignored() {
        let limits = LimitsConfig::default();
        assert_eq!(
            validate_attachment(&attachment(10, Some("image/JPEG; charset=binary")), &limits),
            Ok(())
        );
    }

    #[test]
    fn test_attachment_requires_url() {
        let limits = LimitsConfig::default();
        let mut info = attachment(10, Some("image/gif"));
        info.url.clear();
        assert_eq!(validate_attachment(&info, &limits), Err(AttachmentRule::Incomplete));
    }

    #[test_case(1, 3 => true)]
    #[test_case(3, 3 => true)]
    #[test_case(0, 3 => false)]
    #[test_case(4, 3 => false)]
    #[test_case(1, 0 => false)]
    fn test_position(position: usize, count: usize) -> bool {
        validate_position(position, count).is_ok()
    }

    #[test]
    fn test_text_trimmed_and_bounded() {
        assert_eq!(validate_text("  hello  ", 200).ok(), Some("hello"));
        assert!(matches!(
            validate_text("   ", 200),
            Err(ProfileError::TextLength { max: 200 })
        ));
        assert!(validate_text(&"a".repeat(201), 200).is_err());
        assert!(validate_text(&"ب".repeat(200), 200).is_ok());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("ok-name_2.webp"), "ok-name_2.webp");
        assert_eq!(sanitize_filename("صورة.jpg"), "____.jpg");
    }
}
