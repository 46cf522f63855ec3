//! Data transfer objects for the application layer.

mod profile_dto;

pub use profile_dto::{
    EmptyProfile, GalleryPage, GalleryQuery, GalleryView, LikeOutcome, QuoteOutcome,
    ResetOutcome, UploadOutcome,
};
