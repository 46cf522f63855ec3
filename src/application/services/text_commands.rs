//! Parser for the `!`-prefixed Arabic text commands.

use crate::domain::entities::UserId;

/// Which text command was invoked, used to pick a usage hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommandKind {
    Profile,
    DeleteImage,
    Reorder,
    AddQuote,
    DeleteQuote,
    SetUsername,
    ResetUser,
    GrantPrivilege,
}

impl TextCommandKind {
    const ALIASES: [(&'static str, Self); 8] = [
        ("!بروفايل", Self::Profile),
        ("!حذف_صورة", Self::DeleteImage),
        ("!ترتيب", Self::Reorder),
        ("!نبذة", Self::AddQuote),
        ("!حذف_نبذة", Self::DeleteQuote),
        ("!اسم", Self::SetUsername),
        ("!مسح_مستخدم", Self::ResetUser),
        ("!منح_صلاحية", Self::GrantPrivilege),
    ];

    /// Looks up a command word.
    #[must_use]
    pub fn from_alias(word: &str) -> Option<Self> {
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .map(|(_, kind)| *kind)
    }

    /// The command word that invokes this kind.
    #[must_use]
    pub fn alias(self) -> &'static str {
        Self::ALIASES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(alias, _)| alias)
    }

    /// Restricted to configured administrators.
    #[must_use]
    pub const fn is_admin_only(self) -> bool {
        matches!(self, Self::ResetUser | Self::GrantPrivilege)
    }
}

/// Word that lists privileged users instead of toggling one.
pub const LIST_KEYWORD: &str = "قائمة";

/// Argument of the grant-privilege command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantTarget {
    List,
    User(UserId),
}

/// A fully parsed text command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    Profile { target: Option<UserId> },
    DeleteImage { position: usize },
    Reorder { from: usize, to: usize },
    AddQuote { text: String },
    DeleteQuote { position: usize },
    SetUsername { username: String },
    ResetUser { target: UserId },
    GrantPrivilege { target: GrantTarget },
}

impl TextCommand {
    #[must_use]
    pub const fn kind(&self) -> TextCommandKind {
        match self {
            Self::Profile { .. } => TextCommandKind::Profile,
            Self::DeleteImage { .. } => TextCommandKind::DeleteImage,
            Self::Reorder { .. } => TextCommandKind::Reorder,
            Self::AddQuote { .. } => TextCommandKind::AddQuote,
            Self::DeleteQuote { .. } => TextCommandKind::DeleteQuote,
            Self::SetUsername { .. } => TextCommandKind::SetUsername,
            Self::ResetUser { .. } => TextCommandKind::ResetUser,
            Self::GrantPrivilege { .. } => TextCommandKind::GrantPrivilege,
        }
    }
}

/// Parses a message.
///
/// Returns `None` when the message is not a known command, and
/// `Some(Err(kind))` when the command is known but its arguments are
/// missing or malformed. `first_mention` is the first user the platform
/// resolved as mentioned in the message.
#[must_use]
pub fn parse(
    content: &str,
    first_mention: Option<UserId>,
) -> Option<Result<TextCommand, TextCommandKind>> {
    let content = content.trim_start();
    let (head, remainder) = content.split_at(
        content
            .find(char::is_whitespace)
            .unwrap_or(content.len()),
    );
    let kind = TextCommandKind::from_alias(head)?;
    let args: Vec<&str> = remainder.split_whitespace().collect();

    let target = || first_mention.or_else(|| args.first().and_then(|a| UserId::parse(a)));
    let position = |i: usize| args.get(i).and_then(|a| a.parse::<usize>().ok());
    let rest = || {
        let text = remainder.trim();
        (!text.is_empty()).then(|| text.to_string())
    };

    let command = match kind {
        TextCommandKind::Profile => Some(TextCommand::Profile { target: target() }),
        TextCommandKind::DeleteImage => {
            position(0).map(|position| TextCommand::DeleteImage { position })
        }
        TextCommandKind::Reorder => position(0)
            .zip(position(1))
            .map(|(from, to)| TextCommand::Reorder { from, to }),
        TextCommandKind::AddQuote => rest().map(|text| TextCommand::AddQuote { text }),
        TextCommandKind::DeleteQuote => {
            position(0).map(|position| TextCommand::DeleteQuote { position })
        }
        TextCommandKind::SetUsername => {
            rest().map(|username| TextCommand::SetUsername { username })
        }
        TextCommandKind::ResetUser => target().map(|target| TextCommand::ResetUser { target }),
        TextCommandKind::GrantPrivilege => {
            if args.first() == Some(&LIST_KEYWORD) {
                Some(TextCommand::GrantPrivilege {
                    target: GrantTarget::List,
                })
            } else {
                target().map(|user| TextCommand::GrantPrivilege {
                    target: GrantTarget::User(user),
                })
            }
        }
    };

    Some(command.ok_or(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_ignores_other_messages() {
        assert_eq!(parse("hello there", None), None);
        assert_eq!(parse("", None), None);
        assert_eq!(parse("!unknown 1", None), None);
    }

    #[test]
    fn test_profile_self_and_mention() {
        assert_eq!(
            parse("!بروفايل", None),
            Some(Ok(TextCommand::Profile { target: None }))
        );
        assert_eq!(
            parse("!بروفايل <@42>", Some(UserId(42))),
            Some(Ok(TextCommand::Profile {
                target: Some(UserId(42))
            }))
        );
        assert_eq!(
            parse("!بروفايل 77", None),
            Some(Ok(TextCommand::Profile {
                target: Some(UserId(77))
            }))
        );
    }

    #[test]
    fn test_reorder_positions() {
        assert_eq!(
            parse("!ترتيب 1 3", None),
            Some(Ok(TextCommand::Reorder { from: 1, to: 3 }))
        );
    }

    #[test]
    fn test_quote_keeps_inner_spacing_and_trims_ends() {
        assert_eq!(
            parse("  !نبذة أحب   البرمجة والتصميم ", None),
            Some(Ok(TextCommand::AddQuote {
                text: "أحب   البرمجة والتصميم".to_string()
            }))
        );
    }

    #[test]
    fn test_multi_line_quote_keeps_newlines() {
        assert_eq!(
            parse("!نبذة السطر الأول\nالسطر الثاني\n", None),
            Some(Ok(TextCommand::AddQuote {
                text: "السطر الأول\nالسطر الثاني".to_string()
            }))
        );
    }

    #[test]
    fn test_command_token_may_end_with_newline() {
        assert_eq!(
            parse("!نبذة\nسطر", None),
            Some(Ok(TextCommand::AddQuote {
                text: "سطر".to_string()
            }))
        );
    }

    #[test_case("!حذف_صورة", TextCommandKind::DeleteImage ; "delete image missing")]
    #[test_case("!حذف_صورة abc", TextCommandKind::DeleteImage ; "delete image nan")]
    #[test_case("!ترتيب 1", TextCommandKind::Reorder ; "reorder missing to")]
    #[test_case("!نبذة", TextCommandKind::AddQuote ; "quote empty")]
    #[test_case("!اسم", TextCommandKind::SetUsername ; "username empty")]
    #[test_case("!مسح_مستخدم", TextCommandKind::ResetUser ; "reset missing")]
    #[test_case("!منح_صلاحية bob", TextCommandKind::GrantPrivilege ; "grant bad id")]
    fn test_usage_errors(content: &str, kind: TextCommandKind) {
        assert_eq!(parse(content, None), Some(Err(kind)));
    }

    #[test]
    fn test_grant_list_and_user() {
        assert_eq!(
            parse("!منح_صلاحية قائمة", None),
            Some(Ok(TextCommand::GrantPrivilege {
                target: GrantTarget::List
            }))
        );
        assert_eq!(
            parse("!منح_صلاحية <@!5>", None),
            Some(Ok(TextCommand::GrantPrivilege {
                target: GrantTarget::User(UserId(5))
            }))
        );
    }

    #[test]
    fn test_alias_round_trip() {
        for (alias, kind) in TextCommandKind::ALIASES {
            assert_eq!(kind.alias(), alias);
            assert_eq!(TextCommandKind::from_alias(alias), Some(kind));
        }
        assert!(TextCommandKind::ResetUser.is_admin_only());
        assert!(!TextCommandKind::AddQuote.is_admin_only());
    }
}
