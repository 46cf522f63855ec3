//! User-facing command failures.

use thiserror::Error;

use super::StoreError;

/// Reasons a username is rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameRule {
    TooShort,
    TooLong,
    LettersOnly,
    UnsafeCharacters,
}

/// Reasons an attachment is rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentRule {
    TooLarge { max_bytes: u64 },
    UnsupportedType,
    Incomplete,
}

/// Failures of the platform upload sink.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("storage channel is not configured")]
    NotConfigured,
    #[error("storage channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("upload produced no attachment")]
    MissingAttachment,
    #[error("upload failed: {0}")]
    Failed(String),
}

/// Every way a profile command can be refused or fail.
///
/// Presentation maps each variant to a localized reply.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("caller lacks the required role")]
    NotPermitted,

    #[error("image limit of {max} reached")]
    ImageLimitReached { max: usize },

    #[error("quote limit of {max} reached")]
    QuoteLimitReached { max: usize },

    #[error("no images")]
    NoImages,

    #[error("no quotes")]
    NoQuotes,

    #[error("position must be between 1 and {count}")]
    PositionOutOfRange { count: usize },

    #[error("source and destination positions are the same")]
    SamePosition,

    #[error("username already taken")]
    UsernameTaken,

    #[error("invalid username: {0:?}")]
    InvalidUsername(UsernameRule),

    #[error("text length must be between 1 and {max}")]
    TextLength { max: usize },

    #[error("invalid attachment: {0:?}")]
    InvalidAttachment(AttachmentRule),

    #[error("image not found")]
    ImageNotFound,

    #[error("user has no stored data")]
    NothingToReset,

    #[error("nothing changed")]
    NoChange,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ProfileError {
    /// Internal failures are logged in full and shown generically.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Upload(_) | Self::NoChange)
    }
}

impl From<crate::domain::reorder::MoveError> for ProfileError {
    fn from(err: crate::domain::reorder::MoveError) -> Self {
        match err {
            crate::domain::reorder::MoveError::OutOfRange { len } => {
                Self::PositionOutOfRange { count: len }
            }
            crate::domain::reorder::MoveError::SamePosition => Self::SamePosition,
        }
    }
}
