//! Profile card render request and result.

use bytes::Bytes;

/// One-based position of an image within its gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    pub index: usize,
    pub total: usize,
}

impl CardPosition {
    #[must_use]
    pub const fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Footer label, present only for multi-image galleries.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        (self.total > 1).then(|| format!("{} of {}", self.index, self.total))
    }
}

/// Returns true when the URL names an animated GIF.
///
/// Only the path is inspected, so a `?format=gif` hint on a static
/// resource does not count.
#[must_use]
pub fn is_animated_url(url: &str) -> bool {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    path.to_ascii_lowercase().contains(".gif")
}

/// Transient input for a single card render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequest {
    pub source_url: String,
    pub avatar_url: String,
    pub display_name: String,
    pub like_count: u32,
    pub position: CardPosition,
}

/// Why a render fell back to the unmodified source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    /// Animated source; recompressing would drop the motion.
    Animated,
    /// Download, decode or compositing failed.
    ProcessingFailed,
}

impl std::fmt::Display for PassThroughReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Animated => write!(f, "animated"),
            Self::ProcessingFailed => write!(f, "processing failed"),
        }
    }
}

/// Output of the card renderer. Always displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// Encoded PNG of the composited card.
    Bitmap(Bytes),
    /// Show `original_url` as-is.
    PassThrough {
        is_animated: bool,
        reason: PassThroughReason,
        original_url: String,
    },
}

impl RenderResult {
    #[must_use]
    pub fn animated(original_url: impl Into<String>) -> Self {
        Self::PassThrough {
            is_animated: true,
            reason: PassThroughReason::Animated,
            original_url: original_url.into(),
        }
    }

    #[must_use]
    pub fn processing_failed(original_url: impl Into<String>) -> Self {
        Self::PassThrough {
            is_animated: false,
            reason: PassThroughReason::ProcessingFailed,
            original_url: original_url.into(),
        }
    }

    #[must_use]
    pub const fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap(_))
    }

    #[must_use]
    pub fn pass_through_reason(&self) -> Option<PassThroughReason> {
        match self {
            Self::Bitmap(_) => None,
            Self::PassThrough { reason, .. } => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://cdn.discordapp.com/attachments/1/2/cat.gif", true ; "gif extension")]
    #[test_case("https://cdn.discordapp.com/attachments/1/2/CAT.GIF?ex=1", true ; "upper case with query")]
    #[test_case("https://cdn.discordapp.com/attachments/1/2/cat.png", false ; "png")]
    #[test_case("https://example.com/cat.png?format=gif", false ; "query hint ignored")]
    fn test_is_animated_url(url: &str, expected: bool) {
        assert_eq!(is_animated_url(url), expected);
    }

    #[test]
    fn test_position_label_hidden_for_single_image() {
        assert_eq!(CardPosition::new(1, 1).label(), None);
        assert_eq!(CardPosition::new(2, 5).label().as_deref(), Some("2 of 5"));
    }

    #[test]
    fn test_pass_through_constructors() {
        let animated = RenderResult::animated("https://x/a.gif");
        assert_eq!(animated.pass_through_reason(), Some(PassThroughReason::Animated));
        assert!(matches!(animated, RenderResult::PassThrough { is_animated: true, .. }));

        let failed = RenderResult::processing_failed("https://x/b.png");
        assert_eq!(
            failed.pass_through_reason(),
            Some(PassThroughReason::ProcessingFailed)
        );
        assert!(!failed.is_bitmap());
    }
}
