//! Stateless rules and small stateful helpers shared by the use cases.

pub mod custom_id;
pub mod delivery;
pub mod gallery_service;
pub mod privileges;
pub mod rate_limiter;
pub mod text_commands;
pub mod validation;

pub use custom_id::{COMMENT_INPUT_ID, CustomId, Direction};
pub use delivery::{DeliveryError, deliver};
pub use gallery_service::GalleryService;
pub use privileges::{PrivilegeChange, PrivilegeRegistry};
pub use rate_limiter::RateLimiter;
pub use text_commands::{GrantTarget, TextCommand, TextCommandKind};
