use std::sync::Arc;

use crate::{HierarchyLevel, PermissionBundle, Role, RoleRegistry};

/// Maps roles, typed or as stored strings, to their permission bundles.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    registry: Arc<RoleRegistry>,
}

impl PermissionResolver {
    /// Creates a resolver over an injected registry.
    #[must_use]
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry backing this resolver.
    #[must_use]
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Returns the hierarchy level of a role.
    #[must_use]
    pub fn level_of(&self, role: Role) -> HierarchyLevel {
        self.registry.level_of(role)
    }

    /// Returns the permission bundle of a role.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> &PermissionBundle {
        self.registry.bundle(role)
    }

    /// Parses a stored role value, absent or unknown values resolve to guest.
    #[must_use]
    pub fn resolve_role(&self, value: Option<&str>) -> Role {
        Role::parse_or_guest(value)
    }

    /// Returns the bundle for a stored role value, never more than guest's for unknown values.
    #[must_use]
    pub fn permissions_for_value(&self, value: Option<&str>) -> &PermissionBundle {
        self.permissions_for(self.resolve_role(value))
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new(Arc::new(RoleRegistry::standard()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Role;

    use super::PermissionResolver;

    #[test]
    fn unknown_value_resolves_to_guest_bundle() {
        let resolver = PermissionResolver::default();

        assert_eq!(
            resolver.permissions_for_value(Some("not_a_real_role")),
            resolver.permissions_for(Role::Guest)
        );
        assert_eq!(
            resolver.permissions_for_value(None),
            resolver.permissions_for(Role::Guest)
        );
    }

    #[test]
    fn known_value_resolves_to_its_own_bundle() {
        let resolver = PermissionResolver::default();

        assert_eq!(
            resolver.permissions_for_value(Some("admin")),
            resolver.permissions_for(Role::Admin)
        );
    }

    #[test]
    fn ceilings_never_decrease_with_level() {
        let resolver = PermissionResolver::default();

        for pair in Role::all().windows(2) {
            assert!(resolver.level_of(pair[0]) < resolver.level_of(pair[1]));
            assert!(
                resolver.permissions_for(pair[0]).max_role_level
                    <= resolver.permissions_for(pair[1]).max_role_level
            );
        }
    }

    proptest! {
        #[test]
        fn arbitrary_unrecognized_values_never_elevate(value in "[a-zA-Z_ ]{0,24}") {
            prop_assume!(value.parse::<Role>().is_err());
            let resolver = PermissionResolver::default();

            prop_assert_eq!(
                resolver.permissions_for_value(Some(value.as_str())),
                resolver.permissions_for(Role::Guest)
            );
        }
    }
}
