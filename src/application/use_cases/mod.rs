//! Use case implementations.

mod admin_use_case;
mod backup;
mod engagement_use_case;
mod images_use_case;
mod quotes_use_case;
mod username_use_case;

pub use admin_use_case::AdminUseCase;
pub use engagement_use_case::EngagementUseCase;
pub use images_use_case::ImagesUseCase;
pub use quotes_use_case::QuotesUseCase;
pub use username_use_case::SetUsernameUseCase;
