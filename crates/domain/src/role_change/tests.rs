use proptest::prelude::*;

use crate::Role;

use super::{RoleChangeAuthorizer, RoleChangeDecision};

fn any_role() -> impl Strategy<Value = Role> {
    proptest::sample::select(Role::all())
}

#[test]
fn admin_may_promote_student_to_mentor() {
    let authorizer = RoleChangeAuthorizer::default();

    assert!(authorizer.can_change_role(Role::Admin, Role::Student, Role::Mentor));
}

#[test]
fn moderator_cannot_change_roles() {
    let authorizer = RoleChangeAuthorizer::default();

    assert!(!authorizer.can_change_role(Role::Moderator, Role::Student, Role::Mentor));
    assert_eq!(
        authorizer.evaluate(Role::Moderator, Role::Student, Role::Mentor),
        RoleChangeDecision::MissingRoleManagement
    );
}

#[test]
fn admin_cannot_grant_super_admin() {
    let authorizer = RoleChangeAuthorizer::default();

    assert!(!authorizer.can_change_role(Role::Admin, Role::Mentor, Role::SuperAdmin));
    assert_eq!(
        authorizer.evaluate(Role::Admin, Role::Mentor, Role::SuperAdmin),
        RoleChangeDecision::ExceedsRoleCeiling
    );
}

#[test]
fn admin_cannot_act_on_another_admin() {
    let authorizer = RoleChangeAuthorizer::default();

    assert_eq!(
        authorizer.evaluate(Role::Admin, Role::Admin, Role::Student),
        RoleChangeDecision::TargetNotSubordinate
    );
}

#[test]
fn admin_may_grant_own_level_to_subordinate() {
    let authorizer = RoleChangeAuthorizer::default();

    assert!(authorizer.can_change_role(Role::Admin, Role::Moderator, Role::Admin));
}

#[test]
fn super_admin_cannot_act_on_super_admin() {
    let authorizer = RoleChangeAuthorizer::default();

    assert!(!authorizer.can_change_role(Role::SuperAdmin, Role::SuperAdmin, Role::Guest));
    assert!(authorizer.can_change_role(Role::SuperAdmin, Role::Admin, Role::SuperAdmin));
}

#[test]
fn assignable_roles_stop_at_ceiling() {
    let authorizer = RoleChangeAuthorizer::default();

    let roles = authorizer.assignable_roles(Role::Admin);
    assert_eq!(roles.first(), Some(&Role::Guest));
    assert_eq!(roles.last(), Some(&Role::Admin));
    assert!(!roles.contains(&Role::SuperAdmin));

    assert!(authorizer.assignable_roles(Role::Moderator).is_empty());
    assert_eq!(authorizer.assignable_roles(Role::SuperAdmin).len(), Role::all().len());
}

proptest! {
    #[test]
    fn peers_never_act_on_each_other(role in any_role(), new_role in any_role()) {
        let authorizer = RoleChangeAuthorizer::default();

        prop_assert!(!authorizer.can_change_role(role, role, new_role));
    }

    #[test]
    fn allowed_changes_satisfy_postconditions(
        acting in any_role(),
        target in any_role(),
        new_role in any_role(),
    ) {
        let authorizer = RoleChangeAuthorizer::default();
        let resolver = authorizer.resolver();

        if authorizer.can_change_role(acting, target, new_role) {
            prop_assert!(resolver.level_of(acting) > resolver.level_of(target));
            prop_assert!(
                resolver.level_of(new_role) <= resolver.permissions_for(acting).max_role_level
            );
            prop_assert!(resolver.permissions_for(acting).manage_roles);
        }
    }

    #[test]
    fn evaluation_is_repeatable(
        acting in any_role(),
        target in any_role(),
        new_role in any_role(),
    ) {
        let authorizer = RoleChangeAuthorizer::default();

        let first = authorizer.evaluate(acting, target, new_role);
        let second = authorizer.evaluate(acting, target, new_role);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.is_allowed(), authorizer.can_change_role(acting, target, new_role));
    }

    #[test]
    fn assignable_roles_agree_with_authorizer(acting in any_role(), new_role in any_role()) {
        let authorizer = RoleChangeAuthorizer::default();

        let listed = authorizer.assignable_roles(acting).contains(&new_role);
        prop_assert_eq!(listed, authorizer.can_change_role(acting, Role::Guest, new_role));
    }
}
