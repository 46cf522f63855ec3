//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Validation, rate limiting, privileges and gallery assembly.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{GalleryPage, GalleryQuery, GalleryView, LikeOutcome, UploadOutcome};
pub use services::{GalleryService, PrivilegeRegistry, RateLimiter};
pub use use_cases::{
    AdminUseCase, EngagementUseCase, ImagesUseCase, QuotesUseCase, SetUsernameUseCase,
};
