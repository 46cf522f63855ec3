//! `/setusername`.

use std::sync::Arc;

use tracing::info;

use crate::application::services::validation::validate_username;
use crate::domain::entities::Caller;
use crate::domain::errors::ProfileError;
use crate::domain::ports::{ProfileStorePort, UploadSinkPort};
use crate::infrastructure::config::LimitsConfig;

use super::backup::post_backup;

/// Sets the caller's profile username.
#[derive(Clone)]
pub struct SetUsernameUseCase {
    store: Arc<dyn ProfileStorePort>,
    sink: Arc<dyn UploadSinkPort>,
    limits: LimitsConfig,
}

impl SetUsernameUseCase {
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

    /// Validates and stores `username`, then posts a backup.
    ///
    /// Uniqueness is case-insensitive and ignores the caller's own row,
    /// so changing the case of one's own name is allowed.
    ///
    /// # Errors
    /// Fails when the caller is not allowed, the name is invalid or taken.
    pub async fn execute(&self, caller: &Caller, username: &str) -> Result<String, ProfileError> {
        if !caller.can_set_username() {
            return Err(ProfileError::NotPermitted);
        }

        let username = username.trim();
        validate_username(username, caller.has_relaxed_username_rules(), &self.limits)
            .map_err(ProfileError::InvalidUsername)?;

        if let Some(existing) = self.store.find_user_by_username(username).await? {
            if existing.id() != caller.id {
                return Err(ProfileError::UsernameTaken);
            }
        }

        self.store.set_username(caller.id, username).await?;
        info!(user = %caller.id, username, "Username set");

        post_backup(self.store.as_ref(), self.sink.as_ref(), caller.id).await;
        Ok(username.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CallerFlags, UserId};
    use crate::domain::errors::UsernameRule;
    use crate::domain::ports::mocks::MockUploadSink;
    use crate::infrastructure::persistence::SqliteProfileStore;

    async fn setup() -> (SetUsernameUseCase, Arc<MockUploadSink>, Arc<dyn ProfileStorePort>) {
        let store: Arc<dyn ProfileStorePort> =
            Arc::new(SqliteProfileStore::in_memory().await.unwrap());
        let sink = Arc::new(MockUploadSink::new());
        let use_case = SetUsernameUseCase::new(
            Arc::clone(&store),
            Arc::clone(&sink) as Arc<dyn UploadSinkPort>,
            LimitsConfig::default(),
        );
        (use_case, sink, store)
    }

    fn member(id: u64) -> Caller {
        Caller::new(UserId(id), CallerFlags::ALLOWED_ROLE)
    }

    #[tokio::test]
    async fn test_sets_and_backs_up() {
        let (use_case, sink, store) = setup().await;

        let name = use_case.execute(&member(1), " alice ").await.unwrap();

        assert_eq!(name, "alice");
        let user = store.get_user(UserId(1)).await.unwrap().unwrap();
        assert_eq!(user.username(), Some("alice"));
        assert_eq!(sink.backups()[0].username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_taken_case_insensitive() {
        let (use_case, _, _) = setup().await;
        use_case.execute(&member(1), "alice").await.unwrap();

        assert!(matches!(
            use_case.execute(&member(2), "ALICE").await,
            Err(ProfileError::UsernameTaken)
        ));
        assert_eq!(use_case.execute(&member(1), "Alice").await.unwrap(), "Alice");
    }

    #[tokio::test]
    async fn test_permission_and_rules() {
        let (use_case, _, _) = setup().await;
        let plain = Caller::new(UserId(5), CallerFlags::empty());
        assert!(matches!(
            use_case.execute(&plain, "bob").await,
            Err(ProfileError::NotPermitted)
        ));
        assert!(matches!(
            use_case.execute(&member(5), "bob_1").await,
            Err(ProfileError::InvalidUsername(UsernameRule::LettersOnly))
        ));

        let privileged = Caller::new(UserId(5), CallerFlags::USERNAME_PRIVILEGE);
        assert_eq!(use_case.execute(&privileged, "bob_1").await.unwrap(), "bob_1");
    }
}
