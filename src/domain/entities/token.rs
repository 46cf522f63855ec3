//! Bot token value object.

use std::fmt;

use zeroize::Zeroizing;

/// Discord bot token, wiped from memory on drop and masked in output.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken {
    value: Zeroizing<String>,
}

impl BotToken {
    const MIN_TOKEN_LENGTH: usize = 50;

    /// Creates a token after a basic shape check.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = Zeroizing::new(value.into().trim().to_string());

        if value.len() < Self::MIN_TOKEN_LENGTH || value.split('.').count() != 3 {
            return None;
        }

        Some(Self { value })
    }

    /// Creates a token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4.GabcDe.abcdefghijklmnopqrstuvwxyz0123456789ABCD";

    #[test]
    fn test_valid_token() {
        let token = BotToken::new(format!("  {VALID}\n")).unwrap();
        assert_eq!(token.as_str(), VALID);
    }

    #[test]
    fn test_rejects_malformed_token() {
        assert!(BotToken::new("short").is_none());
        assert!(BotToken::new("a".repeat(60)).is_none());
    }

    #[test]
    fn test_debug_is_masked() {
        let token = BotToken::new_unchecked(VALID);
        let debug = format!("{token:?}");

        assert!(!debug.contains(VALID));
        assert!(debug.contains("MTIz...ABCD"));
    }
}
