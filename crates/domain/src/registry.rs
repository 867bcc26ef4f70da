//! Role hierarchy and the permission table attached to it.

use mentorhub_core::{AppError, AppResult};

use crate::{HierarchyLevel, PermissionBundle, Role};

const ROLE_COUNT: usize = 10;

/// Immutable permission table keyed by [`Role`].
///
/// Built once at process start and shared behind an `Arc`. Nothing mutates
/// it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    bundles: [PermissionBundle; ROLE_COUNT],
}

impl RoleRegistry {
    /// Creates a registry from an explicit table.
    ///
    /// Every role must appear exactly once, no ceiling may exceed its own
    /// role's level, and ceilings must not decrease as levels increase.
    pub fn new(entries: impl IntoIterator<Item = (Role, PermissionBundle)>) -> AppResult<Self> {
        let mut slots: [Option<PermissionBundle>; ROLE_COUNT] = [None; ROLE_COUNT];

        for (role, bundle) in entries {
            let slot = &mut slots[slot_index(role)];
            if slot.is_some() {
                return Err(AppError::Validation(format!(
                    "role '{role}' appears more than once in the permission table"
                )));
            }
            *slot = Some(bundle);
        }

        let mut bundles = [PermissionBundle::NONE; ROLE_COUNT];
        for role in Role::all() {
            bundles[slot_index(*role)] = slots[slot_index(*role)].ok_or_else(|| {
                AppError::Validation(format!("role '{role}' is missing from the permission table"))
            })?;
        }

        let registry = Self { bundles };
        registry.validate()?;
        Ok(registry)
    }

    /// Returns the platform's standard permission table.
    #[must_use]
    pub fn standard() -> Self {
        let member = PermissionBundle::NONE;
        let moderator = PermissionBundle {
            manage_reports: true,
            manage_reviews: true,
            view_analytics: true,
            suspend_users: true,
            delete_content: true,
            access_admin_panel: true,
            max_role_level: Role::Mentor.level(),
            ..PermissionBundle::NONE
        };
        let admin = PermissionBundle {
            manage_users: true,
            manage_roles: true,
            manage_mentors: true,
            manage_sessions: true,
            manage_payments: true,
            manage_payouts: true,
            manage_categories: true,
            max_role_level: Role::Admin.level(),
            ..moderator
        };
        let super_admin = PermissionBundle {
            manage_settings: true,
            view_security_logs: true,
            max_role_level: Role::SuperAdmin.level(),
            ..admin
        };

        Self {
            bundles: [
                member,
                member,
                member,
                member,
                member,
                member,
                member,
                moderator,
                admin,
                super_admin,
            ],
        }
    }

    /// Returns the hierarchy level of a role.
    #[must_use]
    pub fn level_of(&self, role: Role) -> HierarchyLevel {
        role.level()
    }

    /// Returns the permission bundle of a role.
    #[must_use]
    pub fn bundle(&self, role: Role) -> &PermissionBundle {
        &self.bundles[slot_index(role)]
    }

    /// Iterates the table in hierarchy order, lowest role first.
    pub fn entries(&self) -> impl Iterator<Item = (Role, &PermissionBundle)> + '_ {
        Role::all().iter().map(|role| (*role, self.bundle(*role)))
    }

    fn validate(&self) -> AppResult<()> {
        let mut previous_ceiling = HierarchyLevel::NONE;

        for (role, bundle) in self.entries() {
            if bundle.max_role_level > role.level() {
                return Err(AppError::Validation(format!(
                    "role '{role}' may not assign above its own level {} (ceiling {})",
                    role.level(),
                    bundle.max_role_level
                )));
            }

            if bundle.max_role_level < previous_ceiling {
                return Err(AppError::Validation(format!(
                    "role '{role}' has ceiling {} below a lower role's ceiling {previous_ceiling}",
                    bundle.max_role_level
                )));
            }

            previous_ceiling = bundle.max_role_level;
        }

        Ok(())
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn slot_index(role: Role) -> usize {
    role as usize
}
