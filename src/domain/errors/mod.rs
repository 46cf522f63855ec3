//! Domain error types.

mod profile_error;
mod render_error;
mod store_error;

pub use profile_error::{AttachmentRule, ProfileError, UploadError, UsernameRule};
pub use render_error::{RenderError, RenderResultOf};
pub use store_error::StoreError;
