//! Identity and capabilities of whoever issued a command.

use serde::{Deserialize, Serialize};

use super::UserId;

bitflags::bitflags! {
    /// Capabilities resolved for a caller before a use case runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct CallerFlags: u8 {
        /// Configured bot administrator.
        const ADMIN = 1 << 0;
        /// Holds the guild role that unlocks profile editing.
        const ALLOWED_ROLE = 1 << 1;
        /// Granted relaxed username rules by an administrator.
        const USERNAME_PRIVILEGE = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub flags: CallerFlags,
}

impl Caller {
    #[must_use]
    pub const fn new(id: UserId, flags: CallerFlags) -> Self {
        Self { id, flags }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.flags.contains(CallerFlags::ADMIN)
    }

    /// Admins and role holders may edit their profile.
    #[must_use]
    pub const fn can_edit_profile(&self) -> bool {
        self.flags
            .intersects(CallerFlags::ADMIN.union(CallerFlags::ALLOWED_ROLE))
    }

    /// Username privilege also unlocks `/setusername` without the role.
    #[must_use]
    pub const fn can_set_username(&self) -> bool {
        self.can_edit_profile() || self.has_relaxed_username_rules()
    }

    #[must_use]
    pub const fn has_relaxed_username_rules(&self) -> bool {
        self.flags
            .intersects(CallerFlags::ADMIN.union(CallerFlags::USERNAME_PRIVILEGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_member_cannot_edit() {
        let caller = Caller::new(UserId(1), CallerFlags::empty());
        assert!(!caller.can_edit_profile());
        assert!(!caller.can_set_username());
    }

    #[test]
    fn test_privilege_allows_username_only() {
        let caller = Caller::new(UserId(1), CallerFlags::USERNAME_PRIVILEGE);
        assert!(!caller.can_edit_profile());
        assert!(caller.can_set_username());
        assert!(caller.has_relaxed_username_rules());
    }

    #[test]
    fn test_admin_has_everything() {
        let caller = Caller::new(UserId(1), CallerFlags::ADMIN);
        assert!(caller.is_admin());
        assert!(caller.can_edit_profile());
        assert!(caller.has_relaxed_username_rules());
    }
}
