//! Encoding of button and modal custom ids.
//!
//! Ids are `_`-separated: `prev_<owner>_<index>_<requester>`,
//! `next_<owner>_<index>_<requester>`, `like_<image>_<requester>`,
//! `comment_<image>_<requester>` and `commentmodal_<image>`. The index is
//! the zero-based image currently displayed.

use std::fmt;

use crate::domain::entities::{ImageId, UserId};

/// Field name of the comment text input inside the modal.
pub const COMMENT_INPUT_ID: &str = "comment_text";

/// Direction of a pagination button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Index reached by pressing the button while `current` is shown.
    #[must_use]
    pub const fn apply(self, current: usize) -> Option<usize> {
        match self {
            Self::Previous => current.checked_sub(1),
            Self::Next => current.checked_add(1),
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Previous => "prev",
            Self::Next => "next",
        }
    }
}

/// A decoded component interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomId {
    Navigate {
        direction: Direction,
        owner: UserId,
        index: usize,
        requester: UserId,
    },
    Like {
        image: ImageId,
        requester: UserId,
    },
    Comment {
        image: ImageId,
        requester: UserId,
    },
    CommentModal {
        image: ImageId,
    },
}

impl CustomId {
    /// User allowed to press this component, if restricted.
    #[must_use]
    pub const fn requester(&self) -> Option<UserId> {
        match self {
            Self::Navigate { requester, .. }
            | Self::Like { requester, .. }
            | Self::Comment { requester, .. } => Some(*requester),
            Self::CommentModal { .. } => None,
        }
    }

    /// Parses a raw custom id. Unknown or malformed ids yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('_');
        let tag = parts.next()?;
        let args: Vec<&str> = parts.collect();

        let parsed = match (tag, args.as_slice()) {
            ("prev" | "next", [owner, index, requester]) => Self::Navigate {
                direction: if tag == "prev" {
                    Direction::Previous
                } else {
                    Direction::Next
                },
                owner: UserId::parse(owner)?,
                index: index.parse().ok()?,
                requester: UserId::parse(requester)?,
            },
            ("like", [image, requester]) => Self::Like {
                image: ImageId(image.parse().ok()?),
                requester: UserId::parse(requester)?,
            },
            ("comment", [image, requester]) => Self::Comment {
                image: ImageId(image.parse().ok()?),
                requester: UserId::parse(requester)?,
            },
            ("commentmodal", [image]) => Self::CommentModal {
                image: ImageId(image.parse().ok()?),
            },
            _ => return None,
        };
        Some(parsed)
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate {
                direction,
                owner,
                index,
                requester,
            } => write!(f, "{}_{owner}_{index}_{requester}", direction.tag()),
            Self::Like { image, requester } => write!(f, "like_{image}_{requester}"),
            Self::Comment { image, requester } => write!(f, "comment_{image}_{requester}"),
            Self::CommentModal { image } => write!(f, "commentmodal_{image}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_navigation_format() {
        let id = CustomId::Navigate {
            direction: Direction::Next,
            owner: UserId(11),
            index: 2,
            requester: UserId(22),
        };
        assert_eq!(id.to_string(), "next_11_2_22");
        assert_eq!(CustomId::parse("next_11_2_22"), Some(id));
        assert_eq!(id.requester(), Some(UserId(22)));
    }

    #[test]
    fn test_modal_has_no_requester() {
        let id = CustomId::parse("commentmodal_40").unwrap();
        assert_eq!(id, CustomId::CommentModal { image: ImageId(40) });
        assert_eq!(id.requester(), None);
    }

    #[test]
    fn test_like_and_comment_formats() {
        assert_eq!(
            CustomId::parse("like_5_9"),
            Some(CustomId::Like {
                image: ImageId(5),
                requester: UserId(9)
            })
        );
        assert_eq!(
            CustomId::Comment {
                image: ImageId(5),
                requester: UserId(9)
            }
            .to_string(),
            "comment_5_9"
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("prev_1_2" ; "missing requester")]
    #[test_case("next_1_x_3" ; "bad index")]
    #[test_case("like_abc_1" ; "bad image")]
    #[test_case("share_1_2" ; "unknown tag")]
    #[test_case("like_1_2_3" ; "extra field")]
    fn test_rejects_malformed(raw: &str) {
        assert_eq!(CustomId::parse(raw), None);
    }

    #[test]
    fn test_direction_bounds() {
        assert_eq!(Direction::Previous.apply(0), None);
        assert_eq!(Direction::Previous.apply(2), Some(1));
        assert_eq!(Direction::Next.apply(0), Some(1));
    }
}
