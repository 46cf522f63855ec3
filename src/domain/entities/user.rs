//! Profile owner entity.

use serde::{Deserialize, Serialize};

/// Platform user identifier (Discord snowflake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Parses a snowflake, accepting mention syntax (`<@123>` / `<@!123>`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value
            .trim()
            .trim_start_matches("<@")
            .trim_start_matches('!')
            .trim_end_matches('>');
        trimmed.parse().ok().filter(|id| *id != 0).map(Self)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Stored profile row for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUser {
    id: UserId,
    username: Option<String>,
}

impl ProfileUser {
    #[must_use]
    pub fn new(id: UserId, username: Option<String>) -> Self {
        Self { id, username }
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Username chosen with `/setusername`, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the chosen username, or `fallback` (the platform display name).
    #[must_use]
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.username().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_id() {
        assert_eq!(UserId::parse("482427857168236544"), Some(UserId(482_427_857_168_236_544)));
    }

    #[test]
    fn test_parse_mention() {
        assert_eq!(UserId::parse("<@123>"), Some(UserId(123)));
        assert_eq!(UserId::parse("<@!456>"), Some(UserId(456)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(UserId::parse("abc"), None);
        assert_eq!(UserId::parse("0"), None);
        assert_eq!(UserId::parse(""), None);
    }

    #[test]
    fn test_display_name_fallback() {
        let unnamed = ProfileUser::new(UserId(1), None);
        assert_eq!(unnamed.display_name("Guest"), "Guest");

        let named = ProfileUser::new(UserId(1), Some("alice".to_string()));
        assert_eq!(named.display_name("Guest"), "alice");
    }
}
