//! Registry of users granted relaxed username rules.

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::domain::entities::UserId;

/// Outcome of toggling a user's privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeChange {
    Granted,
    Revoked,
}

/// In-memory privilege set owned by the bot process.
///
/// Administrators are seeded at startup and cannot be revoked.
pub struct PrivilegeRegistry {
    admins: HashSet<UserId>,
    granted: RwLock<HashSet<UserId>>,
}

impl PrivilegeRegistry {
    #[must_use]
    pub fn new(admins: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
            granted: RwLock::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn is_admin(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }

    /// Admins always count as privileged.
    #[must_use]
    pub fn is_privileged(&self, user: UserId) -> bool {
        self.is_admin(user) || self.granted.read().contains(&user)
    }

    /// Grants the privilege if absent, revokes it otherwise.
    ///
    /// Returns `None` for administrators, whose privilege is permanent.
    pub fn toggle(&self, user: UserId) -> Option<PrivilegeChange> {
        if self.is_admin(user) {
            return None;
        }
        let mut granted = self.granted.write();
        let change = if granted.remove(&user) {
            PrivilegeChange::Revoked
        } else {
            granted.insert(user);
            PrivilegeChange::Granted
        };
        tracing::info!(user = %user, ?change, "Username privilege changed");
        Some(change)
    }

    /// All privileged users, admins first, each group sorted.
    #[must_use]
    pub fn list(&self) -> Vec<UserId> {
        let mut admins: Vec<_> = self.admins.iter().copied().collect();
        admins.sort_unstable();
        let mut granted: Vec<_> = self
            .granted
            .read()
            .iter()
            .filter(|u| !self.admins.contains(u))
            .copied()
            .collect();
        granted.sort_unstable();
        admins.extend(granted);
        admins
    }
}
