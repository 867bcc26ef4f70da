use serde::{Deserialize, Serialize};

use crate::{PermissionBundle, PermissionResolver, Role};

/// Role state of the acting subject as seen by permission consumers.
///
/// While loading, the snapshot carries the guest role and guest bundle so
/// that nothing is granted before the real role arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRole {
    role: Role,
    permissions: PermissionBundle,
    loading: bool,
}

impl SessionRole {
    /// Returns the snapshot used while a role fetch is pending.
    #[must_use]
    pub fn loading(resolver: &PermissionResolver) -> Self {
        Self {
            role: Role::Guest,
            permissions: *resolver.permissions_for(Role::Guest),
            loading: true,
        }
    }

    /// Returns a settled snapshot for a resolved role.
    #[must_use]
    pub fn ready(role: Role, resolver: &PermissionResolver) -> Self {
        Self {
            role,
            permissions: *resolver.permissions_for(role),
            loading: false,
        }
    }

    /// Returns the resolved role, guest while loading.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the permission bundle of the resolved role.
    #[must_use]
    pub fn permissions(&self) -> &PermissionBundle {
        &self.permissions
    }

    /// Returns whether the role fetch is still pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use crate::{PermissionResolver, Role};

    use super::SessionRole;

    #[test]
    fn loading_snapshot_is_least_privileged() {
        let resolver = PermissionResolver::default();
        let snapshot = SessionRole::loading(&resolver);

        assert!(snapshot.is_loading());
        assert_eq!(snapshot.role(), Role::Guest);
        assert_eq!(snapshot.permissions(), resolver.permissions_for(Role::Guest));
    }

    #[test]
    fn ready_snapshot_carries_role_bundle() {
        let resolver = PermissionResolver::default();
        let snapshot = SessionRole::ready(Role::Moderator, &resolver);

        assert!(!snapshot.is_loading());
        assert!(snapshot.permissions().suspend_users);
    }
}
