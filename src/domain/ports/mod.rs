//! Port definitions implemented by infrastructure adapters.

mod card_render_port;
mod image_fetch_port;
mod profile_store_port;
mod text_render_port;
mod upload_sink_port;

pub use card_render_port::CardRenderPort;
pub use image_fetch_port::ImageFetchPort;
pub use profile_store_port::{
    NewComment, NewImage, ProfileStorePort, PurgeSummary, StoreResult,
};
pub use text_render_port::{TextRenderPort, TextStyle};
pub use upload_sink_port::UploadSinkPort;

#[cfg(test)]
pub mod mocks {
    pub use super::card_render_port::MockCardRenderPort;
    pub use super::image_fetch_port::MockImageFetchPort;
    pub use super::text_render_port::MockTextRenderPort;
    pub use super::upload_sink_port::mock::MockUploadSink;
}
