//! Domain entity definitions.

mod caller;
mod card;
mod gallery;
mod quote;
mod token;
mod user;

pub use caller::{Caller, CallerFlags};
pub use card::{CardPosition, CardRequest, PassThroughReason, RenderResult, is_animated_url};
pub use gallery::{AttachmentInfo, GalleryImage, ImageId, UploadedImage};
pub use quote::{BackupQuote, Comment, CommentId, ProfileBackup, Quote, QuoteId};
pub use token::BotToken;
pub use user::{ProfileUser, UserId};
