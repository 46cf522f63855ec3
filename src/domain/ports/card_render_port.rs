//! Profile card rendering port definition.

use async_trait::async_trait;

use crate::domain::entities::{CardRequest, RenderResult};

/// Port for turning a gallery image into a displayable card.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRenderPort: Send + Sync {
    /// Always returns something displayable; failures become pass-through.
    async fn render(&self, request: &CardRequest) -> RenderResult;
}
