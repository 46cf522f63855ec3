//! Administrator text commands.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::ResetOutcome;
use crate::application::services::privileges::{PrivilegeChange, PrivilegeRegistry};
use crate::domain::entities::{Caller, UserId};
use crate::domain::errors::ProfileError;
use crate::domain::ports::ProfileStorePort;

/// Resets profiles and manages username privileges.
#[derive(Clone)]
pub struct AdminUseCase {
    store: Arc<dyn ProfileStorePort>,
    privileges: Arc<PrivilegeRegistry>,
}

impl AdminUseCase {
    #[must_use]
    pub const fn new(store: Arc<dyn ProfileStorePort>, privileges: Arc<PrivilegeRegistry>) -> Self {
        Self { store, privileges }
    }

    fn require_admin(caller: &Caller) -> Result<(), ProfileError> {
        if caller.is_admin() {
            Ok(())
        } else {
            warn!(user = %caller.id, "Admin command refused");
            Err(ProfileError::NotPermitted)
        }
    }

    /// Deletes the target's images and quotes and clears the username.
    /// The user row itself is kept.
    ///
    /// # Errors
    /// Fails for non-admins or when the target has nothing stored.
    pub async fn reset_user(&self, caller: &Caller, target: UserId) -> Result<ResetOutcome, ProfileError> {
        Self::require_admin(caller)?;

        let summary = self.store.purge_user(target).await?;
        if summary.is_empty() {
            return Err(ProfileError::NothingToReset);
        }

        info!(
            admin = %caller.id,
            target = %target,
            images = summary.images,
            quotes = summary.quotes,
            had_username = summary.had_username,
            "User reset"
        );
        Ok(summary)
    }

    /// Grants or revokes relaxed username rules for `target`.
    ///
    /// # Errors
    /// Fails for non-admins, or with [`ProfileError::NoChange`] when the
    /// target is an administrator.
    pub fn toggle_privilege(&self, caller: &Caller, target: UserId) -> Result<PrivilegeChange, ProfileError> {
        Self::require_admin(caller)?;
        self.privileges.toggle(target).ok_or(ProfileError::NoChange)
    }

    /// Lists privileged users.
    ///
    /// # Errors
    /// Fails for non-admins.
    pub fn privileged_users(&self, caller: &Caller) -> Result<Vec<UserId>, ProfileError> {
        Self::require_admin(caller)?;
        Ok(self.privileges.list())
    }
}
