//! Authorization rules for changing another user's role.
//!
//! The rules are evaluated in order and the first failing rule decides:
//!
//! 1. the acting role must carry `manage_roles`;
//! 2. the target's current level must be strictly below the actor's level;
//! 3. the new role's level must not exceed the actor's `max_role_level`.
//!
//! Equal levels never act on each other, and an actor may hand out exactly
//! its own ceiling but nothing above it.

use serde::{Deserialize, Serialize};

use crate::{PermissionResolver, Role};

/// Outcome of a role-change evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleChangeDecision {
    /// The change is permitted.
    Allowed,
    /// The acting role cannot manage roles at all.
    MissingRoleManagement,
    /// The target is at or above the actor's level.
    TargetNotSubordinate,
    /// The new role is above the actor's assignment ceiling.
    ExceedsRoleCeiling,
}

impl RoleChangeDecision {
    /// Returns whether the change is permitted.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::MissingRoleManagement => "missing_role_management",
            Self::TargetNotSubordinate => "target_not_subordinate",
            Self::ExceedsRoleCeiling => "exceeds_role_ceiling",
        }
    }
}

/// Decides whether an acting role may move a target to a new role.
///
/// Advisory only: callers persist the change after an allowed decision.
#[derive(Debug, Clone, Default)]
pub struct RoleChangeAuthorizer {
    resolver: PermissionResolver,
}

impl RoleChangeAuthorizer {
    /// Creates an authorizer over a permission resolver.
    #[must_use]
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    /// Returns the resolver used for bundle lookups.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Returns whether `acting` may change a `target_current` user to `new_role`.
    #[must_use]
    pub fn can_change_role(&self, acting: Role, target_current: Role, new_role: Role) -> bool {
        self.evaluate(acting, target_current, new_role).is_allowed()
    }

    /// Evaluates the rules and reports the first one that fails.
    #[must_use]
    pub fn evaluate(&self, acting: Role, target_current: Role, new_role: Role) -> RoleChangeDecision {
        let acting_bundle = self.resolver.permissions_for(acting);

        if !acting_bundle.manage_roles {
            return RoleChangeDecision::MissingRoleManagement;
        }

        if self.resolver.level_of(acting) <= self.resolver.level_of(target_current) {
            return RoleChangeDecision::TargetNotSubordinate;
        }

        if self.resolver.level_of(new_role) > acting_bundle.max_role_level {
            return RoleChangeDecision::ExceedsRoleCeiling;
        }

        RoleChangeDecision::Allowed
    }

    /// Lists the roles `acting` may grant to a subordinate, lowest first.
    #[must_use]
    pub fn assignable_roles(&self, acting: Role) -> Vec<Role> {
        let acting_bundle = self.resolver.permissions_for(acting);
        if !acting_bundle.manage_roles {
            return Vec::new();
        }

        Role::all()
            .iter()
            .copied()
            .filter(|role| self.resolver.level_of(*role) <= acting_bundle.max_role_level)
            .collect()
    }
}

#[cfg(test)]
mod tests;
