//! Assembly of gallery pages from stored data and rendered cards.

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::{EmptyProfile, GalleryPage, GalleryQuery, GalleryView};
use crate::domain::entities::{CardPosition, CardRequest, is_animated_url};
use crate::domain::errors::ProfileError;
use crate::domain::ports::{CardRenderPort, ProfileStorePort};
use crate::infrastructure::config::LimitsConfig;

/// Builds the data behind `/profile` and the pagination buttons.
#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn ProfileStorePort>,
    renderer: Arc<dyn CardRenderPort>,
    max_images: usize,
    shown_comments: u32,
}

impl GalleryService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ProfileStorePort>,
        renderer: Arc<dyn CardRenderPort>,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            max_images: limits.max_images,
            shown_comments: limits.shown_comments,
        }
    }

    /// Loads the page at `query.index`.
    ///
    /// # Errors
    /// Returns [`ProfileError::PositionOutOfRange`] when the index is past
    /// the last image, or a store error.
    pub async fn page(&self, query: &GalleryQuery) -> Result<GalleryView, ProfileError> {
        let user = self.store.get_user(query.owner).await?;
        let images = self.store.list_images(query.owner).await?;
        let quotes = self.store.list_quotes(query.owner).await?;
        let username = user.as_ref().and_then(|u| u.username()).map(str::to_string);

        if images.is_empty() {
            debug!(owner = %query.owner, "Gallery is empty");
            return Ok(GalleryView::Empty(EmptyProfile {
                owner: query.owner,
                username,
                quotes,
                max_images: self.max_images,
            }));
        }

        let total = images.len();
        let Some(image) = images.into_iter().nth(query.index) else {
            return Err(ProfileError::PositionOutOfRange { count: total });
        };

        let title_name = username.unwrap_or_else(|| query.owner_display_name.clone());
        let viewer_liked = self.store.has_liked(image.id, query.viewer).await?;
        let comments = self.store.list_comments(image.id, self.shown_comments).await?;
        let is_animated = is_animated_url(&image.url);

        let render = if query.render_card {
            let request = CardRequest {
                source_url: image.url.clone(),
                avatar_url: query.owner_avatar_url.clone(),
                display_name: title_name.clone(),
                like_count: image.like_count,
                position: CardPosition::new(query.index + 1, total),
            };
            Some(self.renderer.render(&request).await)
        } else {
            None
        };

        debug!(
            owner = %query.owner,
            index = query.index,
            total,
            rendered = render.as_ref().is_some_and(|r| r.is_bitmap()),
            "Gallery page assembled"
        );

        Ok(GalleryView::Page(Box::new(GalleryPage {
            owner: query.owner,
            title_name,
            index: query.index,
            total,
            image,
            is_animated,
            quotes,
            comments,
            viewer_liked,
            render,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RenderResult, UserId};
    use crate::domain::ports::NewImage;
    use crate::domain::ports::mocks::MockCardRenderPort;
    use crate::infrastructure::persistence::SqliteProfileStore;
    use bytes::Bytes;

    const OWNER: UserId = UserId(100);
    const VIEWER: UserId = UserId(200);

    fn query(index: usize, render_card: bool) -> GalleryQuery {
        GalleryQuery {
            owner: OWNER,
            owner_display_name: "Owner Display".to_string(),
            owner_avatar_url: "https://cdn.discordapp.com/avatars/100/a.png?size=128".to_string(),
            viewer: VIEWER,
            index,
            render_card,
        }
    }

    async fn store_with_images(urls: &[&str]) -> Arc<dyn ProfileStorePort> {
        let store = SqliteProfileStore::in_memory().await.unwrap();
        store.ensure_user(OWNER).await.unwrap();
        for url in urls {
            store
                .add_image(NewImage {
                    owner: OWNER,
                    url: (*url).to_string(),
                    original_name: None,
                })
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_empty_profile() {
        let store = store_with_images(&[]).await;
        store.set_username(OWNER, "alice").await.unwrap();
        let mut renderer = MockCardRenderPort::new();
        renderer.expect_render().times(0);

        let service = GalleryService::new(store, Arc::new(renderer), &LimitsConfig::default());
        let view = service.page(&query(0, true)).await.unwrap();

        match view {
            GalleryView::Empty(empty) => {
                assert_eq!(empty.username.as_deref(), Some("alice"));
                assert_eq!(empty.max_images, 3);
            }
            GalleryView::Page(_) => panic!("expected empty profile"),
        }
    }

    #[tokio::test]
    async fn test_page_renders_card_with_position() {
        let store = store_with_images(&["https://x/1.png", "https://x/2.png"]).await;
        store.add_quote(OWNER, "hello").await.unwrap();

        let mut renderer = MockCardRenderPort::new();
        renderer
            .expect_render()
            .withf(|r| {
                r.source_url == "https://x/2.png"
                    && r.display_name == "Owner Display"
                    && r.position == CardPosition::new(2, 2)
            })
            .times(1)
            .returning(|_| RenderResult::Bitmap(Bytes::from_static(b"png")));

        let service = GalleryService::new(store, Arc::new(renderer), &LimitsConfig::default());
        let GalleryView::Page(page) = service.page(&query(1, true)).await.unwrap() else {
            panic!("expected page");
        };

        assert_eq!(page.title_name, "Owner Display");
        assert_eq!(page.position(), 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.quotes.len(), 1);
        assert!(page.render.as_ref().is_some_and(RenderResult::is_bitmap));
    }

    #[tokio::test]
    async fn test_navigation_skips_renderer() {
        let store = store_with_images(&["https://x/1.gif?ex=1"]).await;
        let mut renderer = MockCardRenderPort::new();
        renderer.expect_render().times(0);

        let service = GalleryService::new(store, Arc::new(renderer), &LimitsConfig::default());
        let GalleryView::Page(page) = service.page(&query(0, false)).await.unwrap() else {
            panic!("expected page");
        };

        assert!(page.render.is_none());
        assert!(page.is_animated);
    }

    #[tokio::test]
    async fn test_index_past_end() {
        let store = store_with_images(&["https://x/1.png"]).await;
        let service = GalleryService::new(
            store,
            Arc::new(MockCardRenderPort::new()),
            &LimitsConfig::default(),
        );

        let result = service.page(&query(1, false)).await;
        assert!(matches!(result, Err(ProfileError::PositionOutOfRange { count: 1 })));
    }

    #[tokio::test]
    async fn test_viewer_like_and_comments() {
        let store = store_with_images(&["https://x/1.png"]).await;
        let image = store.list_images(OWNER).await.unwrap()[0].id;
        store.ensure_user(VIEWER).await.unwrap();
        store.like(image, VIEWER).await.unwrap();
        for text in ["one", "two", "three", "four"] {
            store
                .add_comment(crate::domain::ports::NewComment {
                    image,
                    author: VIEWER,
                    text: text.to_string(),
                    created_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }

        let service = GalleryService::new(
            store,
            Arc::new(MockCardRenderPort::new()),
            &LimitsConfig::default(),
        );
        let GalleryView::Page(page) = service.page(&query(0, false)).await.unwrap() else {
            panic!("expected page");
        };

        assert!(page.viewer_liked);
        assert_eq!(page.image.like_count, 1);
        let texts: Vec<_> = page.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["four", "three", "two"]);
    }
}
