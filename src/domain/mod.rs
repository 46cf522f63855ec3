//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// List reordering.
pub mod reorder;

pub use entities::{CardRequest, RenderResult, UserId};
pub use errors::{ProfileError, RenderError, StoreError};
pub use ports::{CardRenderPort, ImageFetchPort, ProfileStorePort, TextRenderPort, UploadSinkPort};
