//! Status quote commands.

use std::sync::Arc;

use tracing::info;

use crate::application::dto::QuoteOutcome;
use crate::application::services::validation::{validate_position, validate_text};
use crate::domain::entities::Caller;
use crate::domain::errors::ProfileError;
use crate::domain::ports::{ProfileStorePort, UploadSinkPort};
use crate::domain::reorder::move_item;
use crate::infrastructure::config::LimitsConfig;

use super::backup::post_backup;

/// Handles `/addquote`, `/deletequote` and `/reorderquote`.
#[derive(Clone)]
pub struct QuotesUseCase {
    store: Arc<dyn ProfileStorePort>,
    sink: Arc<dyn UploadSinkPort>,
    limits: LimitsConfig,
}

impl QuotesUseCase {
    #[must_use]
    pub const fn new(
        store: Arc<dyn ProfileStorePort>,
        sink: Arc<dyn UploadSinkPort>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            store,
            sink,
            limits,
        }
    }

    /// Appends a quote. The text command variant passes `role_required`.
    ///
    /// # Errors
    /// Fails on a missing role, invalid length or a full quote list.
    pub async fn add(
        &self,
        caller: &Caller,
        text: &str,
        role_required: bool,
    ) -> Result<QuoteOutcome, ProfileError> {
        if role_required && !caller.can_edit_profile() {
            return Err(ProfileError::NotPermitted);
        }
        let text = validate_text(text, self.limits.max_quote_length)?;

        self.store.ensure_user(caller.id).await?;
        let count = self.store.count_quotes(caller.id).await?;
        if count >= self.limits.max_quotes {
            return Err(ProfileError::QuoteLimitReached {
                max: self.limits.max_quotes,
            });
        }

        let id = self.store.add_quote(caller.id, text).await?;
        info!(user = %caller.id, quote = %id, "Quote added");

        post_backup(self.store.as_ref(), self.sink.as_ref(), caller.id).await;

        Ok(QuoteOutcome {
            count: count + 1,
            max: self.limits.max_quotes,
        })
    }

    /// Deletes the quote at one-based `position`.
    ///
    /// # Errors
    /// Fails when the caller has no quotes or the position is invalid.
    pub async fn delete(&self, caller: &Caller, position: usize) -> Result<(), ProfileError> {
        let quotes = self.store.list_quotes(caller.id).await?;
        if quotes.is_empty() {
            return Err(ProfileError::NoQuotes);
        }
        validate_position(position, quotes.len())?;

        let target = quotes[position - 1].id;
        if !self.store.delete_quote(target, caller.id).await? {
            return Err(ProfileError::NoChange);
        }
        info!(user = %caller.id, quote = %target, position, "Quote deleted");

        post_backup(self.store.as_ref(), self.sink.as_ref(), caller.id).await;
        Ok(())
    }

    /// Moves the quote at `from` to `to`, both one-based.
    ///
    /// # Errors
    /// Fails when the caller has no quotes or a position is invalid.
    pub async fn reorder(&self, caller: &Caller, from: usize, to: usize) -> Result<(), ProfileError> {
        let quotes = self.store.list_quotes(caller.id).await?;
        if quotes.is_empty() {
            return Err(ProfileError::NoQuotes);
        }

        let mut ids: Vec<_> = quotes.iter().map(|q| q.id).collect();
        move_item(&mut ids, from, to)?;
        self.store.reorder_quotes(caller.id, &ids).await?;

        post_backup(self.store.as_ref(), self.sink.as_ref(), caller.id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CallerFlags, UserId};
    use crate::domain::ports::mocks::MockUploadSink;
    use crate::infrastructure::persistence::SqliteProfileStore;

    const USER: UserId = UserId(3);

    async fn setup(sink: Arc<MockUploadSink>) -> (QuotesUseCase, Arc<dyn ProfileStorePort>) {
        let store: Arc<dyn ProfileStorePort> =
            Arc::new(SqliteProfileStore::in_memory().await.unwrap());
        (
            QuotesUseCase::new(Arc::clone(&store), sink, LimitsConfig::default()),
            store,
        )
    }

    fn plain() -> Caller {
        Caller::new(USER, CallerFlags::empty())
    }

    async fn texts(store: &Arc<dyn ProfileStorePort>) -> Vec<String> {
        store
            .list_quotes(USER)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.text)
            .collect()
    }

    #[tokio::test]
    async fn test_add_posts_backup() {
        let sink = Arc::new(MockUploadSink::new());
        let (quotes, _) = setup(Arc::clone(&sink)).await;

        let outcome = quotes.add(&plain(), "  hello world ", false).await.unwrap();

        assert_eq!(outcome, QuoteOutcome { count: 1, max: 3 });
        let backups = sink.backups();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].quotes[0].text, "hello world");
    }

    #[tokio::test]
    async fn test_text_variant_requires_role() {
        let (quotes, _) = setup(Arc::new(MockUploadSink::new())).await;
        assert!(matches!(
            quotes.add(&plain(), "hi", true).await,
            Err(ProfileError::NotPermitted)
        ));
        let member = Caller::new(USER, CallerFlags::ALLOWED_ROLE);
        assert!(quotes.add(&member, "hi", true).await.is_ok());
    }

    #[tokio::test]
    async fn test_limit_and_length() {
        let (quotes, _) = setup(Arc::new(MockUploadSink::new())).await;
        assert!(matches!(
            quotes.add(&plain(), &"x".repeat(201), false).await,
            Err(ProfileError::TextLength { max: 200 })
        ));
        for i in 0..3 {
            quotes.add(&plain(), &format!("q{i}"), false).await.unwrap();
        }
        assert!(matches!(
            quotes.add(&plain(), "q4", false).await,
            Err(ProfileError::QuoteLimitReached { max: 3 })
        ));
    }

    #[tokio::test]
    async fn test_backup_failure_keeps_quote() {
        let (quotes, store) = setup(Arc::new(MockUploadSink::unconfigured())).await;
        quotes.add(&plain(), "kept", false).await.unwrap();
        assert_eq!(texts(&store).await, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_and_reorder() {
        let (quotes, store) = setup(Arc::new(MockUploadSink::new())).await;
        assert!(matches!(
            quotes.delete(&plain(), 1).await,
            Err(ProfileError::NoQuotes)
        ));

        for text in ["a", "b", "c"] {
            quotes.add(&plain(), text, false).await.unwrap();
        }
        quotes.reorder(&plain(), 3, 1).await.unwrap();
        assert_eq!(texts(&store).await, vec!["c", "a", "b"]);

        quotes.delete(&plain(), 2).await.unwrap();
        assert_eq!(texts(&store).await, vec!["c", "b"]);
        assert!(matches!(
            quotes.delete(&plain(), 3).await,
            Err(ProfileError::PositionOutOfRange { count: 2 })
        ));
    }
}
