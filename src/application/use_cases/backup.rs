//! Best-effort profile snapshots after text changes.

use tracing::{debug, warn};

use crate::domain::entities::{ProfileBackup, UserId};
use crate::domain::ports::{ProfileStorePort, UploadSinkPort};

/// Posts the current username and quotes of `user` to the storage channel.
///
/// Failures are logged; the change that triggered the backup stands.
pub(crate) async fn post_backup(
    store: &dyn ProfileStorePort,
    sink: &dyn UploadSinkPort,
    user: UserId,
) {
    let snapshot = async {
        let username = store
            .get_user(user)
            .await?
            .and_then(|u| u.username().map(str::to_string));
        let quotes = store.list_quotes(user).await?;
        Ok::<_, crate::domain::errors::StoreError>(ProfileBackup::new(user, username, &quotes))
    };

    let backup = match snapshot.await {
        Ok(backup) => backup,
        Err(e) => {
            warn!(user = %user, error = %e, "Could not read profile for backup");
            return;
        }
    };

    match sink.backup_profile(&backup).await {
        Ok(()) => debug!(user = %user, quotes = backup.quotes.len(), "Profile backup posted"),
        Err(e) => warn!(user = %user, error = %e, "Profile backup failed"),
    }
}
